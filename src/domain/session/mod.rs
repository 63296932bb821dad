//! Session domain: state, status, transitions and the authoritative store.

mod state;
mod status;
mod store;
mod transition;

pub use state::Session;
pub use status::{Failure, FailureClass, OperationKind, SessionStatus};
pub use store::SessionStore;
pub use transition::Transition;

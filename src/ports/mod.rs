//! Ports - collaborator interfaces the core depends on but does not own.
//!
//! All side effects (remote auth calls, durable storage, notifications,
//! navigation, dialogs) go through these traits; adapters provide the
//! concrete implementations and are injected into the engine explicitly.

mod auth_gateway;
mod confirmation;
mod navigator;
mod notifier;
mod user_store;

pub use auth_gateway::{AuthGateway, GatewayError, LoginPayload, RegisterRequest};
pub use confirmation::{ConfirmationPrompt, ConfirmationRequest};
pub use navigator::Navigator;
pub use notifier::{Notice, NoticeLevel, NotificationSink};
pub use user_store::{UserStore, UserStoreError};

//! Domain layer - pure session and user types, no I/O.

pub mod foundation;
pub mod session;
pub mod user;

//! The session record: current user plus transient operation status.

use serde::Serialize;

use crate::domain::session::SessionStatus;
use crate::domain::user::UserRecord;

/// The process's single authoritative authenticated-user record.
///
/// # Invariants
///
/// - Authenticated iff `user.is_some()`.
/// - A failed login or refresh always leaves `user = None`; a failed verify
///   preserves the prior user until a subsequent refresh failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub status: SessionStatus,
}

impl Session {
    /// Creates an unauthenticated idle session.
    pub fn new() -> Self {
        Self::hydrate(None)
    }

    /// Creates a session from a previously persisted user record, or an
    /// unauthenticated one if nothing usable was stored.
    pub fn hydrate(user: Option<UserRecord>) -> Self {
        Self {
            user,
            status: SessionStatus::Idle,
        }
    }

    /// Whether a user is currently logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

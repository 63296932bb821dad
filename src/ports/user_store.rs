//! User store port - durable key-value mirror of the session.
//!
//! Holds the serialized user record across process restarts plus a couple
//! of user preferences the engine consults (the preferred landing route).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Route;
use crate::domain::user::{UserParameter, UserRecord};

/// Errors that can occur while writing to the store.
///
/// Reads deliberately have no error channel: missing or malformed data
/// hydrates as "no user", never as a failure.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to serialize user record: {0}")]
    Serialization(String),
}

/// Port for the durable local session mirror.
///
/// # Contract
///
/// - `load` returns `None` on missing or corrupt data, it must not fail
/// - the store is single-writer within the process; `patch` may implement
///   read-modify-write under a process-local lock
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Loads the mirrored user record, if a usable one is stored.
    async fn load(&self) -> Option<UserRecord>;

    /// Mirrors the user record.
    async fn save(&self, user: &UserRecord) -> Result<(), UserStoreError>;

    /// Removes the mirrored user record. Idempotent.
    async fn clear(&self) -> Result<(), UserStoreError>;

    /// Applies a single-field update to the mirrored record so a later
    /// hydration matches the live session. No-op when nothing is stored.
    async fn patch(&self, parameter: UserParameter) -> Result<(), UserStoreError>;

    /// The user-configured landing route, if one was saved.
    async fn preferred_route(&self) -> Option<Route>;

    /// Saves the preferred landing route.
    async fn set_preferred_route(&self, route: &Route) -> Result<(), UserStoreError>;
}

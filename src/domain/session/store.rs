//! SessionStore - the single authoritative holder of session state.
//!
//! All mutation goes through [`SessionStore::apply`]; readers either take a
//! point-in-time [`snapshot`](SessionStore::snapshot) or hold a read-only
//! [`subscribe`](SessionStore::subscribe) projection. Multiple consumers
//! share the one store instead of maintaining competing copies.

use tokio::sync::watch;

use crate::domain::session::{Session, Transition};
use crate::domain::user::UserRecord;

/// Thread-safe session holder with atomic transitions.
///
/// Backed by a watch channel: `apply` mutates the value under the channel's
/// internal lock, so no reader ever observes a half-applied transition, and
/// subscribers are woken on every change.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl SessionStore {
    /// Creates an unauthenticated store.
    pub fn new() -> Self {
        Self::hydrated(None)
    }

    /// Creates a store seeded from a previously persisted user record.
    pub fn hydrated(user: Option<UserRecord>) -> Self {
        let (tx, _rx) = watch::channel(Session::hydrate(user));
        Self { tx }
    }

    /// Applies a transition atomically. This is the only mutation entry
    /// point.
    pub fn apply(&self, transition: Transition) {
        self.tx.send_modify(|session| transition.apply(session));
    }

    /// Returns an immutable point-in-time view of the session.
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Returns a read-only projection that observes every transition.
    ///
    /// Hand these out to consumers that would otherwise keep their own
    /// session copy; they all see the same authoritative record.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Whether a user is currently logged in.
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

//! In-memory user store adapter.
//!
//! Volatile implementation for tests and embeddings that do not want a
//! durable mirror. Same contract as the file store, minus the disk.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::Route;
use crate::domain::user::{UserParameter, UserRecord};
use crate::ports::{UserStore, UserStoreError};

/// Volatile user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    user: RwLock<Option<UserRecord>>,
    preferred_route: RwLock<Option<Route>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a user record.
    pub fn with_user(self, user: UserRecord) -> Self {
        *self.user.write().unwrap() = Some(user);
        self
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn load(&self) -> Option<UserRecord> {
        self.user.read().unwrap().clone()
    }

    async fn save(&self, user: &UserRecord) -> Result<(), UserStoreError> {
        *self.user.write().unwrap() = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), UserStoreError> {
        *self.user.write().unwrap() = None;
        Ok(())
    }

    async fn patch(&self, parameter: UserParameter) -> Result<(), UserStoreError> {
        if let Some(user) = self.user.write().unwrap().as_mut() {
            parameter.apply_to(user);
        }
        Ok(())
    }

    async fn preferred_route(&self) -> Option<Route> {
        self.preferred_route.read().unwrap().clone()
    }

    async fn set_preferred_route(&self, route: &Route) -> Result<(), UserStoreError> {
        *self.preferred_route.write().unwrap() = Some(route.clone());
        Ok(())
    }
}

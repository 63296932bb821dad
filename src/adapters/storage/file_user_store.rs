//! File-based user store adapter.
//!
//! Mirrors the user record and the preference settings as JSON files under
//! a base directory, matching the backend's wire shape so the mirror is
//! inspectable and round-trips unchanged.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::foundation::Route;
use crate::domain::user::{UserParameter, UserRecord};
use crate::ports::{UserStore, UserStoreError};

/// Durable JSON mirror of the session.
///
/// Single-writer by design: `patch` performs read-modify-write under a
/// process-local lock.
#[derive(Debug)]
pub struct FileUserStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileUserStore {
    /// Creates a store rooted at a base directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn user_file_path(&self) -> PathBuf {
        self.base_path.join("user.json")
    }

    fn settings_file_path(&self) -> PathBuf {
        self.base_path.join("settings.json")
    }

    async fn ensure_dir(&self) -> Result<(), UserStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| UserStoreError::Io(e.to_string()))
    }

    async fn read_user(&self) -> Option<UserRecord> {
        let path = self.user_file_path();
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            // Missing file is the normal unauthenticated case.
            Err(_) => return None,
        };
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "mirrored user record is corrupt, ignoring");
                None
            }
        }
    }

    async fn write_user(&self, user: &UserRecord) -> Result<(), UserStoreError> {
        self.ensure_dir().await?;
        let json = serde_json::to_string_pretty(user)
            .map_err(|e| UserStoreError::Serialization(e.to_string()))?;
        fs::write(self.user_file_path(), json)
            .await
            .map_err(|e| UserStoreError::Io(e.to_string()))
    }

    async fn read_settings(&self) -> Settings {
        let json = match fs::read_to_string(self.settings_file_path()).await {
            Ok(json) => json,
            Err(_) => return Settings::default(),
        };
        serde_json::from_str(&json).unwrap_or_default()
    }

    async fn write_settings(&self, settings: &Settings) -> Result<(), UserStoreError> {
        self.ensure_dir().await?;
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| UserStoreError::Serialization(e.to_string()))?;
        fs::write(self.settings_file_path(), json)
            .await
            .map_err(|e| UserStoreError::Io(e.to_string()))
    }
}

/// User preferences stored alongside the mirrored record.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    default_page: Option<Route>,
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn load(&self) -> Option<UserRecord> {
        self.read_user().await
    }

    async fn save(&self, user: &UserRecord) -> Result<(), UserStoreError> {
        let _lock = self.write_lock.lock().await;
        self.write_user(user).await
    }

    async fn clear(&self) -> Result<(), UserStoreError> {
        let _lock = self.write_lock.lock().await;
        match fs::remove_file(self.user_file_path()).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(UserStoreError::Io(err.to_string())),
        }
    }

    async fn patch(&self, parameter: UserParameter) -> Result<(), UserStoreError> {
        let _lock = self.write_lock.lock().await;
        if let Some(mut user) = self.read_user().await {
            parameter.apply_to(&mut user);
            self.write_user(&user).await?;
        }
        Ok(())
    }

    async fn preferred_route(&self) -> Option<Route> {
        self.read_settings().await.default_page
    }

    async fn set_preferred_route(&self, route: &Route) -> Result<(), UserStoreError> {
        let _lock = self.write_lock.lock().await;
        let mut settings = self.read_settings().await;
        settings.default_page = Some(route.clone());
        self.write_settings(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::user::PermissionLevel;
    use tempfile::TempDir;

    fn test_user() -> UserRecord {
        UserRecord {
            id: UserId::new("user-1").unwrap(),
            firstname: "Alice".to_string(),
            lastname: "Burel".to_string(),
            email: "alice.burel@epsi.fr".to_string(),
            permission_level: PermissionLevel::Member,
            grade: "B2 G1".to_string(),
            city: "Lyon".to_string(),
            bts: false,
            is_active: true,
            has_information_mails: false,
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store.save(&test_user()).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded, Some(test_user()));
    }

    #[tokio::test]
    async fn load_without_saved_user_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn load_with_corrupt_data_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());
        fs::create_dir_all(temp_dir.path()).await.unwrap();
        fs::write(store.user_file_path(), "{not json")
            .await
            .unwrap();

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_the_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store.save(&test_user()).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn clear_when_nothing_is_stored_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn patch_updates_the_stored_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store.save(&test_user()).await.unwrap();
        store
            .patch(UserParameter::InformationMails(true))
            .await
            .unwrap();

        assert!(store.load().await.unwrap().has_information_mails);
    }

    #[tokio::test]
    async fn patch_without_stored_user_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store
            .patch(UserParameter::InformationMails(true))
            .await
            .unwrap();

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn preferred_route_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        assert!(store.preferred_route().await.is_none());
        store
            .set_preferred_route(&Route::new("/calendar"))
            .await
            .unwrap();

        assert_eq!(store.preferred_route().await, Some(Route::new("/calendar")));
    }

    #[tokio::test]
    async fn preferred_route_survives_user_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path());

        store.save(&test_user()).await.unwrap();
        store
            .set_preferred_route(&Route::new("/calendar"))
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.preferred_route().await, Some(Route::new("/calendar")));
    }
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::protect::TokenProtector;
use super::DataStorage;
use crate::error::Result;
use crate::models::Settings;
use crate::util::sanitize_key;

const SETTINGS_FILE: &str = "settings.json";
const TOKEN_FILE: &str = "auth.dat";
const KEY_FILE: &str = "auth.key";

/// JSON files in a single per-user data directory.
pub struct FileStorage {
    data_dir: PathBuf,
    protector: TokenProtector,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let protector = TokenProtector::new(data_dir.join(KEY_FILE));
        Self {
            data_dir,
            protector,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }

    pub fn data_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    async fn seal_token(&self, token: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let blob = self.protector.protect(token).await?;
        tokio::fs::write(self.token_path(), blob).await?;
        Ok(())
    }

    async fn remove_if_exists(path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DataStorage for FileStorage {
    async fn load_settings(&self) -> Settings {
        match Self::read_json::<Settings>(&self.settings_path()).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        }
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write_json(&self.settings_path(), settings)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to save settings"))
    }

    async fn load_auth_token(&self) -> String {
        let blob = match tokio::fs::read(self.token_path()).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return String::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token");
                return String::new();
            }
        };
        match self.protector.unprotect(&blob).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to unseal auth token");
                String::new()
            }
        }
    }

    async fn save_auth_token(&self, token: &str) -> Result<()> {
        self.seal_token(token)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to save auth token"))
    }

    async fn clear_auth_token(&self) -> Result<()> {
        Self::remove_if_exists(&self.token_path())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to clear auth token"))
    }

    async fn load_data<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        match Self::read_json::<T>(&self.data_path(key)).await {
            Ok(Some(data)) => data,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to load data");
                T::default()
            }
        }
    }

    async fn save_data<T>(&self, key: &str, data: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        self.write_json(&self.data_path(key), data)
            .await
            .inspect_err(|e| tracing::error!(key, error = %e, "Failed to save data"))
    }

    async fn clear_data(&self, key: &str) -> Result<()> {
        Self::remove_if_exists(&self.data_path(key))
            .await
            .inspect_err(|e| tracing::error!(key, error = %e, "Failed to clear data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectionAlgorithm;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Recent {
        instances: Vec<String>,
    }

    #[tokio::test]
    async fn test_missing_settings_load_defaults() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.load_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        let settings = Settings {
            dark_mode_enabled: false,
            poll_interval_seconds: 30,
            auto_join_enabled: true,
            notifications_enabled: false,
            notification_sound: "chime".into(),
            last_selected_group_id: "grp_67890".into(),
            selection_algorithm: SelectionAlgorithm::FewestUsers,
        };

        storage.save_settings(&settings).await.unwrap();
        assert_eq!(storage.load_settings().await, settings);
    }

    #[tokio::test]
    async fn test_corrupt_settings_load_defaults() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.settings_path(), "{not json").unwrap();
        assert_eq!(storage.load_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_save_settings_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let storage = FileStorage::new(blocker.join("data"));
        assert!(storage.save_settings(&Settings::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_token_save_load_clear() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.load_auth_token().await, "");
        storage.save_auth_token("auth-token-123").await.unwrap();
        assert_eq!(storage.load_auth_token().await, "auth-token-123");

        let raw = std::fs::read(storage.token_path()).unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("auth-token-123"));

        storage.clear_auth_token().await.unwrap();
        assert_eq!(storage.load_auth_token().await, "");
        storage.clear_auth_token().await.unwrap();
    }

    #[tokio::test]
    async fn test_garbage_token_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.token_path(), b"definitely not sealed").unwrap();
        assert_eq!(storage.load_auth_token().await, "");
    }

    #[tokio::test]
    async fn test_keyed_data() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let key = "recent/instances:v1";

        assert_eq!(storage.load_data::<Recent>(key).await, Recent::default());

        let recent = Recent {
            instances: vec!["wrld_12345:12345".into()],
        };
        storage.save_data(key, &recent).await.unwrap();
        assert!(dir.path().join("recent_instances_v1.json").exists());
        assert_eq!(storage.load_data::<Recent>(key).await, recent);

        storage.clear_data(key).await.unwrap();
        assert_eq!(storage.load_data::<Recent>(key).await, Recent::default());
    }
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{MockVrchatApi, SessionHandle, VrchatApi};
use crate::storage::{DataStorage, FileStorage};
use crate::view_model::GroupViewModel;

pub type AppApi = MockVrchatApi<FileStorage>;
pub type AppGroupViewModel = GroupViewModel<AppApi, FileStorage>;

/// Wires storage, the API client, and the user's session together.
pub struct App {
    pub storage: Arc<FileStorage>,
    pub api: Arc<AppApi>,
    pub session: SessionHandle,
}

impl App {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_api_delay(data_dir, Duration::from_millis(500))
    }

    pub fn with_api_delay(data_dir: impl Into<PathBuf>, delay: Duration) -> Self {
        let storage = Arc::new(FileStorage::new(data_dir));
        let api = Arc::new(MockVrchatApi::new(storage.clone()).with_delay(delay));
        Self {
            storage,
            api,
            session: SessionHandle::new(),
        }
    }

    /// Sign back in with the token saved by a previous login.
    /// Returns whether the session is now authenticated.
    pub async fn restore_session(&self) -> bool {
        let token = self.storage.load_auth_token().await;
        if token.is_empty() {
            tracing::info!("No saved token, staying signed out");
            return false;
        }
        match self.api.authenticate_with_token(&self.session, &token).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Saved token was rejected");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Token authentication failed");
                false
            }
        }
    }

    pub fn group_view_model(&self) -> AppGroupViewModel {
        GroupViewModel::new(
            self.api.clone(),
            self.storage.clone(),
            self.session.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_restore_session_from_saved_token() {
        let dir = tempdir().unwrap();

        let first = App::with_api_delay(dir.path(), Duration::ZERO);
        assert!(!first.restore_session().await);
        assert!(first
            .api
            .authenticate(&first.session, "user", "pw")
            .await
            .unwrap());

        let second = App::with_api_delay(dir.path(), Duration::ZERO);
        assert!(second.restore_session().await);
        assert!(second.session.is_authenticated().await);
    }
}

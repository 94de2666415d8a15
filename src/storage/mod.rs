use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::Settings;

mod file;
pub mod protect;

pub use file::FileStorage;

/// Persistence for user settings, the authentication token, and arbitrary
/// keyed records.
///
/// Loads never fail: missing or unreadable data yields defaults (an empty
/// token, `T::default()`). Saves and clears surface I/O errors to the caller.
#[async_trait]
pub trait DataStorage: Send + Sync {
    async fn load_settings(&self) -> Settings;
    async fn save_settings(&self, settings: &Settings) -> Result<()>;

    async fn load_auth_token(&self) -> String;
    async fn save_auth_token(&self, token: &str) -> Result<()>;
    async fn clear_auth_token(&self) -> Result<()>;

    async fn load_data<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default + Send + 'static;
    async fn save_data<T>(&self, key: &str, data: &T) -> Result<()>
    where
        T: Serialize + Sync;
    async fn clear_data(&self, key: &str) -> Result<()>;
}

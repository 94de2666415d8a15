use serde::Serialize;

/// All errors that can surface from storage, the API client, or the view-model.
#[derive(Debug, thiserror::Error)]
pub enum JoinerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token protection error: {0}")]
    Crypto(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("{0}")]
    Custom(String),
}

// Errors cross the presentation boundary as plain strings.
impl Serialize for JoinerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JoinerError>;

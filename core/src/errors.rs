use thiserror::Error;

/// Failure of the underlying key/value storage primitive.
///
/// These are environment-level failures (disk full, permissions, poisoned
/// lock). They are never produced for a missing or malformed value.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Crate-level errors for configuration loading and client construction
#[derive(Error, Debug)]
pub enum TweeterError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

/// Result type for client core operations
pub type TweeterResult<T> = Result<T, TweeterError>;

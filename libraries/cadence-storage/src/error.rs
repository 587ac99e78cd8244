/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error reported through the core store trait
    #[error(transparent)]
    Backend(#[from] cadence_core::CoreError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for cadence_core::CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Backend(inner) => inner,
            StorageError::Io(io) => cadence_core::CoreError::Io(io),
            other => cadence_core::CoreError::storage(other.to_string()),
        }
    }
}

/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CoreError {
    /// A catalog needs at least one track
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Track descriptor failed validation
    #[error("Invalid track at position {position}: {reason}")]
    InvalidTrack { position: usize, reason: String },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid track error
    pub fn invalid_track(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTrack {
            position,
            reason: reason.into(),
        }
    }
}

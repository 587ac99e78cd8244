//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track index outside the catalog
    #[error("Index out of bounds: {index} (catalog has {len} tracks)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Track duration has not been reported by the transport yet
    #[error("Track duration is not known yet")]
    DurationUnknown,

    /// Invalid seek position
    #[error("Invalid seek position: {0}")]
    InvalidSeek(f64),

    /// Catalog or configuration error
    #[error(transparent)]
    Core(#[from] cadence_core::CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

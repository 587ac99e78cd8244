//! Core types for playback management

use cadence_core::Theme;
use serde::{Deserialize, Serialize};

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume used when no level was persisted (0.0 - 1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat flag (default: off)
    pub repeat: bool,

    /// How close to the reported duration counts as the end of the track,
    /// in seconds (default: 0.05)
    pub end_tolerance_secs: f64,

    /// Fixed seed for the shuffle RNG (default: seeded from entropy)
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: false,
            end_tolerance_secs: 0.05,
            shuffle_seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Parse a (possibly partial) JSON config over the defaults
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config = serde_json::from_str(json).map_err(cadence_core::CoreError::from)?;
        Ok(config)
    }
}

/// What the engine did with a transport notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Notification {
    /// Notification belonged to a replaced source (or a handled end) and was dropped
    Discarded,

    /// State and display were updated
    Applied,

    /// Track ended and restarted from the top (repeat on)
    Restarted,

    /// Track ended and playback moved to the given index
    Advanced(usize),
}

/// Plain-data snapshot of everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Catalog index of the current track (the active playlist row)
    pub index: usize,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Cover image URI
    pub artwork_uri: String,
    /// Elapsed time as `M:SS`
    pub elapsed: String,
    /// Duration as `M:SS` (`0:00` until known)
    pub total: String,
    /// Fraction played (0.0 - 1.0)
    pub progress: f64,
    /// Play/pause intent
    pub is_playing: bool,
    /// Shuffle button state
    pub shuffle: bool,
    /// Repeat button state
    pub repeat: bool,
    /// Theme
    pub theme: Theme,
    /// Volume slider position (0.0 - 1.0)
    pub volume: f32,
}

//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued by the
//! engine at key points and drained by the host, which renders from them:
//! - Track changes (display fields, active playlist row)
//! - Duration resolution (after the transport reports metadata)
//! - Progress updates (every time notification)
//! - Play/pause, shuffle, repeat, theme and volume changes

use crate::transport::Generation;
use cadence_core::Theme;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// A track was bound to the transport
    #[serde(rename_all = "camelCase")]
    TrackLoaded {
        /// Catalog index (also the active playlist row)
        index: usize,
        /// Track title
        title: String,
        /// Artist name
        artist: String,
        /// Cover image URI
        artwork_uri: String,
        /// Source generation the track was bound with
        generation: u64,
    },

    /// Duration of the current track became known
    #[serde(rename_all = "camelCase")]
    DurationResolved {
        /// Duration in seconds
        duration_secs: f64,
        /// Duration as `M:SS`
        total: String,
    },

    /// Playhead moved
    Progress {
        /// Fraction played (0.0 - 1.0)
        fraction: f64,
        /// Elapsed time as `M:SS`
        elapsed: String,
    },

    /// Play/pause intent changed
    #[serde(rename_all = "camelCase")]
    StateChanged {
        /// New intent
        is_playing: bool,
    },

    /// Current track reached its end
    TrackFinished {
        /// Catalog index of the finished track
        index: usize,
        /// True when the track restarts (repeat on)
        repeated: bool,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// New flag
        enabled: bool,
    },

    /// Repeat toggled
    RepeatChanged {
        /// New flag
        enabled: bool,
    },

    /// Theme toggled
    ThemeChanged {
        /// New theme
        theme: Theme,
    },

    /// Volume changed
    VolumeChanged {
        /// New level (0.0 - 1.0)
        level: f32,
    },

    /// A command was rejected
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    pub(crate) fn track_loaded(
        index: usize,
        track: &cadence_core::Track,
        generation: Generation,
    ) -> Self {
        Self::TrackLoaded {
            index,
            title: track.title.clone(),
            artist: track.artist.clone(),
            artwork_uri: track.artwork_uri.clone(),
            generation: generation.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PlaybackEvent::StateChanged { is_playing: true };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "stateChanged");
        assert_eq!(json["isPlaying"], true);
    }

    #[test]
    fn track_loaded_carries_display_fields() {
        let track = cadence_core::Track::new("safar", "jass", "songs/safar.mp4", "images/safer.jpeg");
        let event = PlaybackEvent::track_loaded(2, &track, Generation(9));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "trackLoaded");
        assert_eq!(json["artworkUri"], "images/safer.jpeg");
        assert_eq!(json["generation"], 9);
    }

    #[test]
    fn theme_changed_uses_lowercase_theme() {
        let json = serde_json::to_value(PlaybackEvent::ThemeChanged { theme: Theme::Light }).unwrap();
        assert_eq!(json["theme"], "light");
    }
}

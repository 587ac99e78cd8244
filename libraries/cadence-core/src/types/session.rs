/// Session state persisted across restarts
use serde::{Deserialize, Serialize};

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other theme
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session state as read back from storage
///
/// Every field is independently optional: a missing key stays `None` here and
/// the playback engine decides what the default is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Last selected track index
    pub last_song_index: Option<usize>,

    /// Last transport volume (0.0 - 1.0)
    pub last_volume: Option<f32>,

    /// UI theme preference
    pub theme: Option<Theme>,
}

impl PersistedSession {
    /// True when nothing was stored
    pub fn is_empty(&self) -> bool {
        self.last_song_index.is_none() && self.last_volume.is_none() && self.theme.is_none()
    }
}

/// Complete session state handed to storage on save
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current track index
    pub index: usize,

    /// Transport volume (0.0 - 1.0)
    pub volume: f32,

    /// UI theme
    pub theme: Theme,
}

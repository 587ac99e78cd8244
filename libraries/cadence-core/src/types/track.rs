//! Track descriptors and the fixed catalog they live in

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// The catalog the player ships with
const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.json");

/// A playable track descriptor
///
/// Immutable once it is part of a [`Catalog`]. No field is required to be
/// unique: two entries may share a title or even a media URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// URI handed to the media transport
    #[serde(alias = "src", alias = "media_uri")]
    pub media_uri: String,

    /// URI of the cover image
    #[serde(alias = "img", alias = "artwork_uri")]
    pub artwork_uri: String,
}

impl Track {
    /// Create a new track descriptor
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        media_uri: impl Into<String>,
        artwork_uri: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            media_uri: media_uri.into(),
            artwork_uri: artwork_uri.into(),
        }
    }
}

/// Ordered, 0-indexed, fixed-length list of tracks
///
/// Constructed once at startup and never mutated. Always holds at least one
/// track so that "current index" is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog from track descriptors
    ///
    /// # Errors
    /// Returns `CoreError::EmptyCatalog` for an empty list and
    /// `CoreError::InvalidTrack` for an entry without a media URI
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }

        if let Some(position) = tracks
            .iter()
            .position(|track| track.media_uri.trim().is_empty())
        {
            return Err(CoreError::invalid_track(position, "missing media URI"));
        }

        Ok(Self { tracks })
    }

    /// Parse a JSON descriptor list
    ///
    /// Accepts both `mediaUri`/`artworkUri` and the short `src`/`img` names.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the list fails validation
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Self::new(tracks)
    }

    /// The catalog bundled with the player
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_CATALOG) {
            Ok(catalog) => catalog,
            Err(err) => unreachable!("bundled catalog is invalid: {err}"),
        }
    }

    /// Number of tracks (always at least 1)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false: a catalog holds at least one track
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Check whether `index` addresses a track
    pub fn contains(&self, index: usize) -> bool {
        index < self.tracks.len()
    }

    /// Get the track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Iterate over the tracks in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// All tracks as a slice
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tracks = Vec::<Track>::deserialize(deserializer)?;
        Self::new(tracks).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

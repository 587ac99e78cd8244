//! Playlist presenter
//!
//! Turns the catalog into display rows and keeps exactly one of them marked
//! active: the row of the engine's current track.

use crate::shell::Command;
use cadence_core::Catalog;
use serde::{Deserialize, Serialize};

/// One rendered playlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRow {
    /// Catalog index (row key)
    pub index: usize,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Cover image URI
    pub artwork_uri: String,
    /// Highlighted as the current track
    pub is_active: bool,
}

/// Playlist rows with a single active highlight
#[derive(Debug, Clone)]
pub struct PlaylistPresenter {
    rows: Vec<PlaylistRow>,
    active: usize,
}

impl PlaylistPresenter {
    /// Build rows for `catalog` with `active` highlighted
    ///
    /// An out-of-range `active` highlights the first row.
    pub fn new(catalog: &Catalog, active: usize) -> Self {
        let active = if catalog.contains(active) { active } else { 0 };

        let rows = catalog
            .iter()
            .enumerate()
            .map(|(index, track)| PlaylistRow {
                index,
                title: track.title.clone(),
                artist: track.artist.clone(),
                artwork_uri: track.artwork_uri.clone(),
                is_active: index == active,
            })
            .collect();

        Self { rows, active }
    }

    /// All rows in catalog order
    pub fn rows(&self) -> &[PlaylistRow] {
        &self.rows
    }

    /// Index of the highlighted row
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Move the highlight
    ///
    /// Returns `true` if the highlight changed. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index == self.active || index >= self.rows.len() {
            return false;
        }

        if let Some(row) = self.rows.get_mut(self.active) {
            row.is_active = false;
        }
        if let Some(row) = self.rows.get_mut(index) {
            row.is_active = true;
        }
        self.active = index;
        true
    }

    /// Command for a click on row `index`
    pub fn select(&self, index: usize) -> Option<Command> {
        (index < self.rows.len()).then_some(Command::SelectTrack(index))
    }
}

//! Session persistence
//!
//! Reads and writes the three session keys. Values are stored as strings so
//! any flat key-value backend (including browser `localStorage`) can hold them.
//!
//! | key | encoding |
//! |---|---|
//! | `lastSongIndex` | decimal integer |
//! | `lastVolume` | decimal float in `[0, 1]` |
//! | `theme` | `"light"` or `"dark"` (absent means dark) |
//!
//! `load` never invents defaults: a missing or unreadable key comes back as
//! `None` and the caller decides.

use crate::error::Result;
use cadence_core::{KeyValueStore, PersistedSession, SessionSnapshot, Theme};
use tracing::{debug, warn};

// Session key constants
/// Last selected track index
pub const KEY_LAST_SONG_INDEX: &str = "lastSongIndex";

/// Last transport volume
pub const KEY_LAST_VOLUME: &str = "lastVolume";

/// UI theme
pub const KEY_THEME: &str = "theme";

/// All session keys, in write order
pub const SESSION_KEYS: [&str; 3] = [KEY_LAST_SONG_INDEX, KEY_LAST_VOLUME, KEY_THEME];

/// Write a session snapshot
///
/// Overwrites all three keys. Every key is attempted even if an earlier one
/// fails; keys are not written atomically as a group.
///
/// # Errors
///
/// Returns the first write error
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, snapshot: &SessionSnapshot) -> Result<()> {
    let values = [
        snapshot.index.to_string(),
        snapshot.volume.to_string(),
        snapshot.theme.as_str().to_string(),
    ];

    let mut first_error = None;
    for (key, value) in SESSION_KEYS.iter().zip(values.iter()) {
        if let Err(err) = store.set(key, value) {
            warn!(key = %key, error = %err, "Failed to write session key");
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => {
            debug!(
                index = snapshot.index,
                volume = snapshot.volume,
                theme = %snapshot.theme,
                "Session saved"
            );
            Ok(())
        }
    }
}

/// Read the stored session
///
/// # Errors
///
/// Returns an error only if the store itself fails; malformed values are
/// logged and reported as absent
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<PersistedSession> {
    let last_song_index = store
        .get(KEY_LAST_SONG_INDEX)?
        .and_then(|raw| parse_index(&raw));
    let last_volume = store
        .get(KEY_LAST_VOLUME)?
        .and_then(|raw| parse_volume(&raw));
    let theme = store.get(KEY_THEME)?.and_then(|raw| parse_theme(&raw));

    Ok(PersistedSession {
        last_song_index,
        last_volume,
        theme,
    })
}

/// Remove every session key
///
/// # Errors
///
/// Returns an error if the store rejects a delete
pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    for key in SESSION_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

fn parse_index(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(err) => {
            warn!(value = %raw, error = %err, "Ignoring unreadable stored track index");
            None
        }
    }
}

fn parse_volume(raw: &str) -> Option<f32> {
    match raw.trim().parse::<f32>() {
        Ok(volume) if volume.is_finite() => {
            let clamped = volume.clamp(0.0, 1.0);
            if clamped != volume {
                debug!(stored = volume, clamped, "Clamped stored volume");
            }
            Some(clamped)
        }
        Ok(_) => {
            warn!(value = %raw, "Ignoring non-finite stored volume");
            None
        }
        Err(err) => {
            warn!(value = %raw, error = %err, "Ignoring unreadable stored volume");
            None
        }
    }
}

fn parse_theme(raw: &str) -> Option<Theme> {
    let theme = Theme::from_str(raw.trim());
    if theme.is_none() {
        warn!(value = %raw, "Ignoring unknown stored theme");
    }
    theme
}

//! JSON file key-value store
//!
//! Stores all keys as one flat JSON object:
//!
//! ```json
//! { "lastSongIndex": "2", "lastVolume": "0.6", "theme": "light" }
//! ```
//!
//! The file is rewritten on every write. Writes go to a temporary sibling
//! first and are renamed over the target, so a crash leaves either the old or
//! the new object on disk, never a truncated one.

use crate::error::{Result, StorageError};
use cadence_core::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store, reading existing contents
    ///
    /// A missing file is an empty store; it is created on first write.
    ///
    /// # Errors
    /// Returns `StorageError::Unavailable` if the path is a directory, or an
    /// error if the file exists but cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.is_dir() {
            return Err(StorageError::unavailable(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Session file not found, starting empty");
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, entries })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> cadence_core::Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }

        let mut next = self.entries.clone();
        next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}

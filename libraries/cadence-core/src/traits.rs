/// Core traits for Cadence
use crate::error::Result;

/// Flat string key-value store
///
/// The persistence seam for session state. Implementors are expected to be
/// cheap to call from the playback engine's command handlers: every command
/// that changes the track index, volume or theme writes through it.
///
/// Implementations exist for memory and JSON files (`cadence-storage`) and for
/// the browser's `localStorage` (`cadence-playback`, `wasm` feature).
pub trait KeyValueStore {
    /// Read a value
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the backing store rejects the write
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value (no-op if absent)
    ///
    /// # Errors
    /// Returns an error if the backing store rejects the delete
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

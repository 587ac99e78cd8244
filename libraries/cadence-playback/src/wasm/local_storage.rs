//! Browser `localStorage` session store

use cadence_core::{CoreError, KeyValueStore, Result};
use cadence_storage::StorageError;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Session store backed by `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the current window's `localStorage`
    ///
    /// # Errors
    /// Returns an error outside a window context, or when the browser denies
    /// storage access (privacy modes, sandboxed iframes)
    pub fn open() -> cadence_storage::Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::unavailable("No window available"))?;
        let storage = window
            .local_storage()
            .map_err(|err| StorageError::unavailable(format!("localStorage: {:?}", err)))?
            .ok_or_else(|| StorageError::unavailable("localStorage is not available"))?;

        Ok(Self { storage })
    }
}

fn js_error(err: JsValue) -> CoreError {
    CoreError::storage(format!("localStorage: {:?}", err))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

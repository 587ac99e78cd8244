//! Cadence Storage
//!
//! Session persistence for Cadence: the last played track, the volume and the
//! UI theme, kept in a flat string key-value store.
//!
//! # Architecture
//!
//! - **Stores**: [`MemoryStore`] and [`FileStore`] implement
//!   [`cadence_core::KeyValueStore`]; the browser build adds `localStorage`
//! - **Session slice**: [`session`] owns the key names and the string encoding
//!   of each field, and is the only code that knows about them
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{SessionSnapshot, Theme};
//! use cadence_storage::{session, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! assert!(session::load(&store).unwrap().is_empty());
//!
//! session::save(&mut store, &SessionSnapshot { index: 3, volume: 0.5, theme: Theme::Light }).unwrap();
//!
//! let restored = session::load(&store).unwrap();
//! assert_eq!(restored.last_song_index, Some(3));
//! assert_eq!(restored.theme, Some(Theme::Light));
//! ```

mod error;
mod file;
mod memory;

pub mod session;

pub use error::{Result, StorageError};
pub use file::FileStore;
pub use memory::MemoryStore;

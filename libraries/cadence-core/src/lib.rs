//! Cadence Core
//!
//! Platform-agnostic core types, traits, and error handling for Cadence.
//!
//! This crate provides the foundational building blocks shared by the storage
//! and playback libraries (native hosts and the browser build alike).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Catalog`, `Theme`, session snapshots
//! - **Core Traits**: `KeyValueStore` (flat string persistence)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Catalog, Track};
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("Intro", "Artist", "songs/intro.mp3", "images/intro.jpeg"),
//!     Track::new("Outro", "Artist", "songs/outro.mp3", "images/outro.jpeg"),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.get(1).unwrap().title, "Outro");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::KeyValueStore;

pub use types::{Catalog, PersistedSession, SessionSnapshot, Theme, Track};

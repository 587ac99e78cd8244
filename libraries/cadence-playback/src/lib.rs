//! Cadence - Playback Engine
//!
//! Platform-agnostic playback management for the Cadence playlist player.
//!
//! This crate provides:
//! - The playback engine (play/pause, next/previous, shuffle, repeat, seek, volume)
//! - End-of-track policy driven by transport notifications
//! - Stale notification filtering through source generations
//! - Session persistence (last track, volume, theme)
//! - Playlist rows with a single active highlight
//! - The UI command surface and keyboard bindings
//!
//! # Architecture
//!
//! The engine never touches a media element directly. It issues directives
//! through the [`Transport`] trait and receives what the platform observes
//! (`loadedmetadata`, `timeupdate`, `ended`) as notifications tagged with the
//! [`Generation`] of the source they belong to. Browser bindings live behind
//! the `wasm` feature.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Catalog;
//! use cadence_playback::{MemoryTransport, PlaybackConfig, PlaybackEngine};
//! use cadence_storage::MemoryStore;
//!
//! let transport = MemoryTransport::new();
//! let mut engine = PlaybackEngine::restore(
//!     Catalog::bundled(),
//!     Box::new(transport.clone()),
//!     Box::new(MemoryStore::new()),
//!     PlaybackConfig::default(),
//! );
//!
//! engine.toggle_play_pause();
//! assert!(transport.is_playing());
//!
//! // The platform reports the duration once metadata is available
//! let generation = engine.generation();
//! engine.on_metadata_loaded(generation, 185.0);
//! assert_eq!(engine.view().total, "3:05");
//!
//! engine.next();
//! assert_eq!(engine.current_index(), 1);
//! ```

mod engine;
mod error;
pub mod events;
pub mod presenter;
pub mod shell;
mod shuffle;
pub mod time;
pub mod transport;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use presenter::{PlaylistPresenter, PlaylistRow};
pub use shell::{Command, KeyBinding, PlayerShell};
pub use time::{format_time, progress_fraction};
pub use transport::{Generation, MemoryTransport, Transport};
pub use types::{Notification, PlaybackConfig, PlayerView};
pub use volume::Volume;

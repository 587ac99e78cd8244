//! WASM bindings for cadence-playback
//!
//! Browser glue for the playback engine: an `HTMLAudioElement` transport, a
//! `localStorage` session store and the JS-facing [`WasmPlayer`].

pub mod audio;
pub mod local_storage;
pub mod player;

pub use audio::HtmlAudioTransport;
pub use local_storage::LocalStorageStore;
pub use player::WasmPlayer;

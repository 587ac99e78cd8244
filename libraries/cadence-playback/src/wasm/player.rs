//! WASM-compatible player wrapper

use super::{audio::HtmlAudioTransport, local_storage::LocalStorageStore};
use crate::{
    engine::PlaybackEngine,
    error::PlaybackError,
    shell::{Command, PlayerShell},
    transport::Generation,
    types::{Notification, PlaybackConfig},
};
use cadence_core::{Catalog, KeyValueStore};
use cadence_storage::MemoryStore;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

/// Media callbacks registered for one source generation
struct MediaHandlers {
    generation: Generation,
    _metadata: Closure<dyn FnMut()>,
    _time_update: Closure<dyn FnMut()>,
    _ended: Closure<dyn FnMut()>,
}

/// Handlers kept alive after being replaced, for events already in flight
const RETAINED_HANDLERS: usize = 2;

struct Shared {
    shell: RefCell<PlayerShell>,
    audio: HtmlAudioElement,
    on_event: RefCell<Option<Function>>,
    on_error: RefCell<Option<Function>>,
    handlers: RefCell<Vec<MediaHandlers>>,
}

impl Shared {
    /// Feed a media notification to the engine, then publish the effects
    fn notify(self: &Rc<Self>, apply: impl FnOnce(&mut PlayerShell) -> Notification) {
        // Skip re-entrant dispatch; the outer call publishes afterwards
        let Ok(mut shell) = self.shell.try_borrow_mut() else {
            return;
        };
        apply(&mut shell);
        drop(shell);

        self.after_change();
    }

    fn after_change(self: &Rc<Self>) {
        self.bind_media_handlers();
        self.emit_events();
    }

    /// Register callbacks for the current generation if the source changed
    fn bind_media_handlers(self: &Rc<Self>) {
        let Ok(shell) = self.shell.try_borrow() else {
            return;
        };
        let generation = shell.engine().generation();
        drop(shell);

        let bound = self.handlers.borrow().last().map(|h| h.generation);
        if bound == Some(generation) {
            return;
        }

        let metadata = {
            let weak = Rc::downgrade(self);
            Closure::<dyn FnMut()>::new(move || {
                with_shared(&weak, |shared| {
                    let duration = shared.audio.duration();
                    shared.notify(|shell| shell.on_metadata_loaded(generation, duration));
                });
            })
        };

        let time_update = {
            let weak = Rc::downgrade(self);
            Closure::<dyn FnMut()>::new(move || {
                with_shared(&weak, |shared| {
                    let current_time = shared.audio.current_time();
                    let duration = shared.audio.duration();
                    shared.notify(|shell| shell.on_time_update(generation, current_time, duration));
                });
            })
        };

        let ended = {
            let weak = Rc::downgrade(self);
            Closure::<dyn FnMut()>::new(move || {
                with_shared(&weak, |shared| {
                    shared.notify(|shell| shell.on_ended(generation));
                });
            })
        };

        self.audio
            .set_onloadedmetadata(Some(metadata.as_ref().unchecked_ref()));
        self.audio
            .set_ontimeupdate(Some(time_update.as_ref().unchecked_ref()));
        self.audio.set_onended(Some(ended.as_ref().unchecked_ref()));

        let mut handlers = self.handlers.borrow_mut();
        handlers.push(MediaHandlers {
            generation,
            _metadata: metadata,
            _time_update: time_update,
            _ended: ended,
        });
        if handlers.len() > RETAINED_HANDLERS {
            handlers.remove(0);
        }
    }

    fn emit_events(&self) {
        let Ok(mut shell) = self.shell.try_borrow_mut() else {
            return;
        };
        let callback = self.on_event.borrow().clone();
        let Some(callback) = callback else {
            // Keep events queued until a listener registers
            return;
        };
        let events = shell.drain_events();
        drop(shell);

        for event in events {
            match serde_wasm_bindgen::to_value(&event) {
                Ok(value) => {
                    callback.call1(&JsValue::NULL, &value).ok();
                }
                Err(err) => warn!(error = %err, "Failed to serialize event"),
            }
        }
    }

    fn handle_error(&self, error: PlaybackError) -> JsValue {
        let message = error.to_string();

        let callback = self.on_error.borrow().clone();
        if let Some(callback) = callback {
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(&message))
                .ok();
        }

        JsValue::from_str(&message)
    }
}

fn with_shared(weak: &Weak<Shared>, f: impl FnOnce(&Rc<Shared>)) {
    if let Some(shared) = weak.upgrade() {
        f(&shared);
    }
}

fn busy() -> JsValue {
    JsValue::from_str("Player is busy")
}

/// WASM-compatible playlist player
///
/// Wraps the playback engine and the UI shell around a page's `<audio>`
/// element. The session is kept in `localStorage` (in memory if the browser
/// denies access).
#[wasm_bindgen]
pub struct WasmPlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player and restore the last session
    ///
    /// `catalog` is an array of track descriptors (the bundled catalog when
    /// omitted); `config` is a partial `PlaybackConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        audio: HtmlAudioElement,
        catalog: JsValue,
        config: JsValue,
    ) -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let catalog = if catalog.is_undefined() || catalog.is_null() {
            Catalog::bundled()
        } else {
            serde_wasm_bindgen::from_value::<Catalog>(catalog)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse catalog: {}", e)))?
        };

        let config = if config.is_undefined() || config.is_null() {
            PlaybackConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<PlaybackConfig>(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!(error = %err, "Session will not survive a reload");
                Box::new(MemoryStore::new())
            }
        };

        let engine = PlaybackEngine::restore(
            catalog,
            Box::new(HtmlAudioTransport::new(audio.clone())),
            store,
            config,
        );

        let shared = Rc::new(Shared {
            shell: RefCell::new(PlayerShell::new(engine)),
            audio,
            on_event: RefCell::new(None),
            on_error: RefCell::new(None),
            handlers: RefCell::new(Vec::new()),
        });
        shared.bind_media_handlers();

        Ok(Self { shared })
    }

    fn dispatch(&self, command: Command) -> Result<(), JsValue> {
        let result = {
            let mut shell = self.shared.shell.try_borrow_mut().map_err(|_| busy())?;
            shell.dispatch(command)
        };

        self.shared.after_change();
        result.map_err(|e| self.shared.handle_error(e))
    }

    // ===== Playback Control =====

    /// Play or pause
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> Result<(), JsValue> {
        self.dispatch(Command::TogglePlayPause)
    }

    /// Skip to next track
    pub fn next(&self) -> Result<(), JsValue> {
        self.dispatch(Command::Next)
    }

    /// Go to previous track
    pub fn prev(&self) -> Result<(), JsValue> {
        self.dispatch(Command::Prev)
    }

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, level: f32) -> Result<(), JsValue> {
        self.dispatch(Command::SetVolume(level))
    }

    /// Seek by fraction of the track (0.0 - 1.0)
    pub fn seek(&self, fraction: f64) -> Result<(), JsValue> {
        self.dispatch(Command::Seek(fraction))
    }

    /// Toggle shuffle
    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) -> Result<(), JsValue> {
        self.dispatch(Command::ToggleShuffle)
    }

    /// Toggle repeat
    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&self) -> Result<(), JsValue> {
        self.dispatch(Command::ToggleRepeat)
    }

    /// Toggle light/dark theme
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Result<(), JsValue> {
        self.dispatch(Command::ToggleTheme)
    }

    /// Show or hide the playlist panel
    #[wasm_bindgen(js_name = togglePlaylistPanel)]
    pub fn toggle_playlist_panel(&self) -> Result<(), JsValue> {
        self.dispatch(Command::TogglePlaylistPanel)
    }

    /// Play the track at `index` (playlist row click)
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&self, index: usize) -> Result<(), JsValue> {
        self.dispatch(Command::SelectTrack(index))
    }

    /// Handle a `keydown` code
    ///
    /// Returns `true` when the key is bound, so the page can call
    /// `preventDefault()`.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, code: &str) -> Result<bool, JsValue> {
        let result = {
            let mut shell = self.shared.shell.try_borrow_mut().map_err(|_| busy())?;
            shell.handle_key(code)
        };

        self.shared.after_change();
        result.map_err(|e| self.shared.handle_error(e))
    }

    // ===== State Queries =====

    /// Current render state (`PlayerView`)
    pub fn view(&self) -> JsValue {
        let Ok(shell) = self.shared.shell.try_borrow() else {
            return JsValue::NULL;
        };
        serde_wasm_bindgen::to_value(&shell.view()).unwrap_or(JsValue::NULL)
    }

    /// Playlist rows (`PlaylistRow[]`)
    pub fn playlist(&self) -> JsValue {
        let Ok(shell) = self.shared.shell.try_borrow() else {
            return JsValue::NULL;
        };
        serde_wasm_bindgen::to_value(shell.presenter().rows()).unwrap_or(JsValue::NULL)
    }

    /// Whether the playlist panel is shown
    #[wasm_bindgen(js_name = isPlaylistOpen)]
    pub fn is_playlist_open(&self) -> bool {
        self.shared
            .shell
            .try_borrow()
            .map(|shell| shell.is_playlist_open())
            .unwrap_or(false)
    }

    /// Current theme ("light" | "dark")
    pub fn theme(&self) -> String {
        self.shared
            .shell
            .try_borrow()
            .map(|shell| shell.engine().theme().as_str().to_string())
            .unwrap_or_default()
    }

    // ===== Event Listeners =====

    /// Register the event callback
    ///
    /// Receives every `PlaybackEvent`, starting with the ones queued while
    /// restoring the session.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.shared.on_event.borrow_mut() = Some(callback);
        self.shared.emit_events();
    }

    /// Register error callback
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Function) {
        *self.shared.on_error.borrow_mut() = Some(callback);
    }
}

impl Drop for WasmPlayer {
    fn drop(&mut self) {
        self.shared.audio.set_onloadedmetadata(None);
        self.shared.audio.set_ontimeupdate(None);
        self.shared.audio.set_onended(None);
        self.shared.handlers.borrow_mut().clear();
    }
}

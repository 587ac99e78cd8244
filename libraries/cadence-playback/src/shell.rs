//! UI shell command surface
//!
//! Buttons, sliders, keys and playlist clicks all become a [`Command`];
//! [`PlayerShell`] routes them to the engine and keeps the playlist
//! highlight and panel state in step.

use crate::{
    engine::PlaybackEngine,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    presenter::PlaylistPresenter,
    transport::Generation,
    types::{Notification, PlayerView},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User intent coming from the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Command {
    /// Play/pause button
    TogglePlayPause,
    /// Next button
    Next,
    /// Previous button
    Prev,
    /// Volume slider (0.0 - 1.0)
    SetVolume(f32),
    /// Progress bar click (fraction 0.0 - 1.0)
    Seek(f64),
    /// Shuffle button
    ToggleShuffle,
    /// Repeat button
    ToggleRepeat,
    /// Theme button
    ToggleTheme,
    /// Playlist panel button
    TogglePlaylistPanel,
    /// Playlist row click
    SelectTrack(usize),
}

/// Keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    /// `Space`: play/pause
    Space,
    /// `ArrowRight`: next track
    ArrowRight,
    /// `ArrowLeft`: previous track
    ArrowLeft,
}

impl KeyBinding {
    /// Binding for a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Self::Space),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowLeft" => Some(Self::ArrowLeft),
            _ => None,
        }
    }

    /// Command this key triggers
    pub fn command(self) -> Command {
        match self {
            Self::Space => Command::TogglePlayPause,
            Self::ArrowRight => Command::Next,
            Self::ArrowLeft => Command::Prev,
        }
    }

    /// Command for a key code, if it is bound
    pub fn command_for(code: &str) -> Option<Command> {
        Self::from_code(code).map(Self::command)
    }
}

/// Engine plus the presentation state around it
#[derive(Debug)]
pub struct PlayerShell {
    engine: PlaybackEngine,
    presenter: PlaylistPresenter,
    playlist_open: bool,
}

impl PlayerShell {
    /// Wrap an engine; the playlist panel starts closed
    pub fn new(engine: PlaybackEngine) -> Self {
        let presenter = PlaylistPresenter::new(engine.catalog(), engine.current_index());
        Self {
            engine,
            presenter,
            playlist_open: false,
        }
    }

    /// Apply a command
    ///
    /// A seek before the duration is known is a silent no-op. Other
    /// rejections (such as an out-of-range selection) are returned.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Dispatching command");

        match command {
            Command::TogglePlayPause => {
                self.engine.toggle_play_pause();
            }
            Command::Next => {
                self.engine.next();
            }
            Command::Prev => {
                self.engine.prev();
            }
            Command::SetVolume(level) => {
                self.engine.set_volume(level);
            }
            Command::Seek(fraction) => match self.engine.seek(fraction) {
                Ok(_) | Err(PlaybackError::DurationUnknown) => {}
                Err(err) => return Err(err),
            },
            Command::ToggleShuffle => {
                self.engine.toggle_shuffle();
            }
            Command::ToggleRepeat => {
                self.engine.toggle_repeat();
            }
            Command::ToggleTheme => {
                self.engine.toggle_theme();
            }
            Command::TogglePlaylistPanel => {
                self.playlist_open = !self.playlist_open;
            }
            Command::SelectTrack(index) => {
                self.engine.select_track(index)?;
                self.playlist_open = false;
            }
        }

        self.sync_highlight();
        Ok(())
    }

    /// Apply the command bound to `code`
    ///
    /// Returns `Ok(false)` for unbound keys.
    pub fn handle_key(&mut self, code: &str) -> Result<bool> {
        match KeyBinding::command_for(code) {
            Some(command) => self.dispatch(command).map(|()| true),
            None => Ok(false),
        }
    }

    /// Forward a metadata notification
    pub fn on_metadata_loaded(&mut self, generation: Generation, duration: f64) -> Notification {
        self.engine.on_metadata_loaded(generation, duration)
    }

    /// Forward a time notification (may advance to another track)
    pub fn on_time_update(
        &mut self,
        generation: Generation,
        current_time: f64,
        duration: f64,
    ) -> Notification {
        let notification = self.engine.on_time_update(generation, current_time, duration);
        self.sync_highlight();
        notification
    }

    /// Forward an end-of-media notification (may advance to another track)
    pub fn on_ended(&mut self, generation: Generation) -> Notification {
        let notification = self.engine.on_ended(generation);
        self.sync_highlight();
        notification
    }

    fn sync_highlight(&mut self) {
        self.presenter.set_active(self.engine.current_index());
    }

    /// The engine
    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// The playlist rows
    pub fn presenter(&self) -> &PlaylistPresenter {
        &self.presenter
    }

    /// Whether the playlist panel is shown
    pub fn is_playlist_open(&self) -> bool {
        self.playlist_open
    }

    /// Current render state
    pub fn view(&self) -> PlayerView {
        self.engine.view()
    }

    /// Take queued engine events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.engine.drain_events()
    }
}

//! Playback engine - core orchestration
//!
//! Owns the playback state, the transport and the session store, and applies
//! the navigation policy (shuffle/repeat/next/previous).

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    shuffle::{next_sequential_index, next_shuffled_index, previous_index},
    time::{format_time, known_duration, progress_fraction},
    transport::{Generation, Transport},
    types::{Notification, PlaybackConfig, PlayerView},
    volume::Volume,
};
use cadence_core::{Catalog, KeyValueStore, PersistedSession, SessionSnapshot, Theme, Track};
use cadence_storage::session;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Central playback management
///
/// Orchestrates everything between the UI and the media transport:
/// - Track loading (binds the transport source, publishes display fields)
/// - Play/pause intent
/// - Navigation (next with shuffle, previous, direct selection)
/// - End-of-track policy (repeat or advance)
/// - Seek and volume
/// - Session persistence (index, volume, theme)
///
/// Single-threaded: every method runs to completion. Transport notifications
/// are passed in by the host and carry the [`Generation`] of the source they
/// were registered for; notifications for a replaced source are dropped.
pub struct PlaybackEngine {
    catalog: Catalog,
    transport: Box<dyn Transport>,
    store: Box<dyn KeyValueStore>,

    // State
    current_index: usize,
    is_playing: bool,
    shuffle: bool,
    repeat: bool,
    volume: Volume,
    theme: Theme,

    // Current source
    generation: Generation,
    duration: Option<f64>,
    position: f64,
    end_handled: bool,
    end_tolerance: f64,

    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create an engine with default session state
    ///
    /// Binds the first track; does not start playback.
    pub fn new(
        catalog: Catalog,
        transport: Box<dyn Transport>,
        store: Box<dyn KeyValueStore>,
        config: PlaybackConfig,
    ) -> Self {
        let mut engine = Self::build(catalog, transport, store, &config);
        engine.apply_session(PersistedSession::default());
        engine
    }

    /// Create an engine from the persisted session
    ///
    /// A store read failure is logged and treated as an empty session. A stored
    /// index that no longer fits the catalog falls back to the first track.
    /// Does not start playback and does not write the session back.
    pub fn restore(
        catalog: Catalog,
        transport: Box<dyn Transport>,
        store: Box<dyn KeyValueStore>,
        config: PlaybackConfig,
    ) -> Self {
        let mut engine = Self::build(catalog, transport, store, &config);

        let persisted = match session::load(&*engine.store) {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "Failed to read session, using defaults");
                PersistedSession::default()
            }
        };

        engine.apply_session(persisted);
        engine
    }

    fn build(
        catalog: Catalog,
        transport: Box<dyn Transport>,
        store: Box<dyn KeyValueStore>,
        config: &PlaybackConfig,
    ) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog,
            transport,
            store,
            current_index: 0,
            is_playing: false,
            shuffle: config.shuffle,
            repeat: config.repeat,
            volume: Volume::new(config.volume),
            theme: Theme::default(),
            generation: Generation::default(),
            duration: None,
            position: 0.0,
            end_handled: false,
            end_tolerance: config.end_tolerance_secs.max(0.0),
            rng,
            pending_events: Vec::new(),
        }
    }

    fn apply_session(&mut self, persisted: PersistedSession) {
        if let Some(level) = persisted.last_volume {
            self.volume.set_level(level);
        }
        if let Some(theme) = persisted.theme {
            self.theme = theme;
        }

        let index = match persisted.last_song_index {
            Some(index) if self.catalog.contains(index) => index,
            Some(index) => {
                warn!(
                    index,
                    len = self.catalog.len(),
                    "Stored track index is out of range, starting from the first track"
                );
                0
            }
            None => 0,
        };

        self.transport.set_volume(self.volume.level());
        self.bind(index);
    }

    // ===== Track Loading =====

    /// Load the track at `index`
    ///
    /// Keeps the play/pause intent: if playing, the new source starts right
    /// away. Duration is published later, when the transport reports metadata.
    /// An out-of-range index is logged and rejected with state unchanged.
    pub fn load_track(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.bind(index);
        Ok(())
    }

    /// Jump to the track at `index` and play it (playlist row selection)
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.advance_to(index);
        Ok(())
    }

    fn check_index(&mut self, index: usize) -> Result<()> {
        let len = self.catalog.len();
        if index < len {
            return Ok(());
        }

        warn!(index, len, "Rejected out-of-range track index");
        let err = PlaybackError::IndexOutOfBounds { index, len };
        self.pending_events.push(PlaybackEvent::Error {
            message: err.to_string(),
        });
        Err(err)
    }

    /// Bind an already validated index to the transport
    fn bind(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };

        self.current_index = index;
        self.generation = self.generation.next();
        self.duration = None;
        self.position = 0.0;
        self.end_handled = false;

        self.transport.set_source(&track.media_uri, self.generation);
        self.pending_events
            .push(PlaybackEvent::track_loaded(index, track, self.generation));
        debug!(index, generation = %self.generation, uri = %track.media_uri, "Track loaded");

        if self.is_playing {
            self.transport.play();
        }
    }

    // ===== Playback Control =====

    /// Flip play/pause intent and persist
    ///
    /// Returns the new intent.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.is_playing {
            self.transport.pause();
        } else {
            self.transport.play();
        }
        self.set_playing_intent(!self.is_playing);
        self.persist();
        self.is_playing
    }

    /// Skip to the next track
    ///
    /// With shuffle on, picks a random track other than the current one;
    /// otherwise moves to the following track, wrapping at the end. Always
    /// plays. Returns the new index.
    pub fn next(&mut self) -> usize {
        let len = self.catalog.len();
        let index = if self.shuffle {
            next_shuffled_index(self.current_index, len, &mut self.rng)
        } else {
            next_sequential_index(self.current_index, len)
        };

        self.advance_to(index);
        index
    }

    /// Go to the previous track
    ///
    /// Always the preceding catalog entry (wrapping at the start), whatever
    /// the shuffle flag says. Always plays. Returns the new index.
    pub fn prev(&mut self) -> usize {
        let index = previous_index(self.current_index, self.catalog.len());
        self.advance_to(index);
        index
    }

    fn advance_to(&mut self, index: usize) {
        self.set_playing_intent(true);
        self.bind(index);
        self.persist();
    }

    fn set_playing_intent(&mut self, is_playing: bool) {
        if self.is_playing != is_playing {
            self.is_playing = is_playing;
            self.pending_events
                .push(PlaybackEvent::StateChanged { is_playing });
        }
    }

    // ===== Transport Notifications =====

    /// Transport resolved the duration of a source
    pub fn on_metadata_loaded(&mut self, generation: Generation, duration: f64) -> Notification {
        if self.is_stale(generation, "metadata") {
            return Notification::Discarded;
        }

        match known_duration(duration) {
            Some(duration) => self.resolve_duration(duration),
            None => debug!(duration, "Transport reported no usable duration"),
        }
        Notification::Applied
    }

    /// Periodic playhead notification
    ///
    /// Updates progress and, once the playhead reaches the end, applies the
    /// end-of-track policy: restart with repeat on, otherwise advance like
    /// [`next`](Self::next). While playing, the end counts from the end
    /// tolerance before the duration; while paused, only the duration itself
    /// counts, so a pause close to the end stays a pause.
    pub fn on_time_update(
        &mut self,
        generation: Generation,
        current_time: f64,
        duration: f64,
    ) -> Notification {
        if self.is_stale(generation, "time update") {
            return Notification::Discarded;
        }

        if let Some(duration) = known_duration(duration) {
            self.resolve_duration(duration);
        }

        let current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };
        self.position = current_time;
        self.push_progress();

        let Some(duration) = self.duration else {
            return Notification::Applied;
        };

        if current_time >= self.end_threshold(duration) {
            if self.end_handled {
                return Notification::Applied;
            }
            return self.finish_track();
        }

        self.end_handled = false;
        Notification::Applied
    }

    /// Transport reached the end of a source
    ///
    /// Ignored when the end was already handled from a time update.
    pub fn on_ended(&mut self, generation: Generation) -> Notification {
        if self.is_stale(generation, "ended") {
            return Notification::Discarded;
        }
        if self.end_handled {
            debug!(generation = %generation, "End already handled");
            return Notification::Discarded;
        }

        self.finish_track()
    }

    fn is_stale(&self, generation: Generation, kind: &str) -> bool {
        if generation == self.generation {
            return false;
        }

        debug!(
            kind,
            received = %generation,
            current = %self.generation,
            "Discarding notification for a replaced source"
        );
        true
    }

    /// Position from which a time update counts as the end of the track
    ///
    /// The tolerance never covers more than half the track, so the playhead
    /// can leave the end window after a restart.
    fn end_threshold(&self, duration: f64) -> f64 {
        if !self.is_playing {
            return duration;
        }
        duration - self.end_tolerance.min(duration / 2.0)
    }

    /// Record a reported duration; publishes only changes
    fn resolve_duration(&mut self, duration: f64) {
        if self.duration == Some(duration) {
            return;
        }
        self.duration = Some(duration);
        self.pending_events.push(PlaybackEvent::DurationResolved {
            duration_secs: duration,
            total: format_time(duration),
        });
    }

    fn finish_track(&mut self) -> Notification {
        self.end_handled = true;
        let index = self.current_index;

        if self.repeat {
            self.pending_events.push(PlaybackEvent::TrackFinished {
                index,
                repeated: true,
            });
            self.transport.seek(0.0);
            self.position = 0.0;
            self.transport.play();
            self.set_playing_intent(true);
            self.push_progress();
            debug!(index, "Track restarted");
            Notification::Restarted
        } else {
            self.pending_events.push(PlaybackEvent::TrackFinished {
                index,
                repeated: false,
            });
            Notification::Advanced(self.next())
        }
    }

    fn push_progress(&mut self) {
        self.pending_events.push(PlaybackEvent::Progress {
            fraction: progress_fraction(self.position, self.duration.unwrap_or(0.0)),
            elapsed: format_time(self.position),
        });
    }

    // ===== Seek =====

    /// Seek to a fraction of the current track (0.0 - 1.0)
    ///
    /// Out-of-range fractions are clamped. Returns the target position in
    /// seconds. Nothing happens while the duration is unknown.
    pub fn seek(&mut self, fraction: f64) -> Result<f64> {
        if fraction.is_nan() {
            return Err(PlaybackError::InvalidSeek(fraction));
        }

        let Some(duration) = self.duration else {
            debug!(fraction, "Seek ignored, duration unknown");
            return Err(PlaybackError::DurationUnknown);
        };

        let target = fraction.clamp(0.0, 1.0) * duration;
        self.transport.seek(target);
        self.position = target;
        self.end_handled = false;
        self.push_progress();
        Ok(target)
    }

    // ===== Volume =====

    /// Set volume (0.0 - 1.0) and persist
    ///
    /// Out-of-range levels are clamped; NaN is ignored. Returns the level in
    /// effect afterwards.
    pub fn set_volume(&mut self, level: f32) -> f32 {
        if !self.volume.set_level(level) {
            debug!("Ignoring NaN volume");
            return self.volume.level();
        }

        let level = self.volume.level();
        self.transport.set_volume(level);
        self.pending_events
            .push(PlaybackEvent::VolumeChanged { level });
        self.persist();
        level
    }

    // ===== Shuffle, Repeat & Theme =====

    /// Flip the shuffle flag (applies from the next skip)
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
        self.shuffle
    }

    /// Flip the repeat flag (applies at the next track end)
    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.pending_events.push(PlaybackEvent::RepeatChanged {
            enabled: self.repeat,
        });
        self.repeat
    }

    /// Switch between light and dark theme and persist
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.pending_events
            .push(PlaybackEvent::ThemeChanged { theme: self.theme });
        self.persist();
        self.theme
    }

    // ===== Persistence =====

    /// Session state as it would be saved now
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            index: self.current_index,
            volume: self.volume.level(),
            theme: self.theme,
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(err) = session::save(&mut *self.store, &snapshot) {
            warn!(error = %err, "Failed to persist session");
        }
    }

    /// Session store the engine writes to
    pub fn session_store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    // ===== State Queries =====

    /// The catalog being played
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Index of the current track
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current track
    pub fn current_track(&self) -> &Track {
        // current_index is validated on every bind
        &self.catalog.tracks()[self.current_index]
    }

    /// Play/pause intent (may lead the transport while media loads)
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Shuffle flag
    pub fn is_shuffle_on(&self) -> bool {
        self.shuffle
    }

    /// Repeat flag
    pub fn is_repeat_on(&self) -> bool {
        self.repeat
    }

    /// Current volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Generation of the bound source
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Duration of the current track, once the transport reported it
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Last reported playhead position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Everything the UI renders, as plain data
    pub fn view(&self) -> PlayerView {
        let track = self.current_track();
        PlayerView {
            index: self.current_index,
            title: track.title.clone(),
            artist: track.artist.clone(),
            artwork_uri: track.artwork_uri.clone(),
            elapsed: format_time(self.position),
            total: format_time(self.duration.unwrap_or(0.0)),
            progress: progress_fraction(self.position, self.duration.unwrap_or(0.0)),
            is_playing: self.is_playing,
            shuffle: self.shuffle,
            repeat: self.repeat,
            theme: self.theme,
            volume: self.volume.level(),
        }
    }

    // ===== Events =====

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check whether events are queued
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("current_index", &self.current_index)
            .field("is_playing", &self.is_playing)
            .field("shuffle", &self.shuffle)
            .field("repeat", &self.repeat)
            .field("volume", &self.volume.level())
            .field("theme", &self.theme)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//! Platform media transport
//!
//! Abstracts the media element that actually decodes and plays audio (an
//! `HTMLAudioElement` in browsers). The engine only issues directives through
//! this trait; what the transport observes comes back as notifications
//! (`on_metadata_loaded`, `on_time_update`, `on_ended`) tagged with the
//! [`Generation`] passed to [`Transport::set_source`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identity of one source binding
///
/// Bumped by every track load. Callbacks registered for a source capture the
/// generation it was bound with, so late notifications from a replaced source
/// can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platform media transport
///
/// Requests are fire-and-forget: there is no completion or cancellation, a
/// later call supersedes an earlier one.
pub trait Transport {
    /// Bind a new media source
    ///
    /// Notifications about this source must carry `generation`.
    fn set_source(&mut self, uri: &str, generation: Generation);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Move the playhead (seconds from start)
    fn seek(&mut self, position_secs: f64);

    /// Set output level (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
}

/// Recorded state of a [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTransportState {
    /// URI of the bound source
    pub source: Option<String>,
    /// Generation the source was bound with
    pub generation: Generation,
    /// Whether the last request was play
    pub playing: bool,
    /// Last requested playhead position
    pub position_secs: f64,
    /// Last requested volume
    pub volume: f32,
    /// Number of `set_source` calls
    pub loads: usize,
    /// Number of `play` calls
    pub play_requests: usize,
    /// Every seek target, in order
    pub seeks: Vec<f64>,
}

impl Default for MemoryTransportState {
    fn default() -> Self {
        Self {
            source: None,
            generation: Generation::default(),
            playing: false,
            position_secs: 0.0,
            // Media elements start at full volume
            volume: 1.0,
            loads: 0,
            play_requests: 0,
            seeks: Vec::new(),
        }
    }
}

/// Headless transport that only records requests
///
/// Clones share state, so a host (or a test) can keep a handle while the
/// engine owns the boxed transport.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Rc<RefCell<MemoryTransportState>>,
}

impl MemoryTransport {
    /// Create a transport with nothing loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded state
    pub fn snapshot(&self) -> MemoryTransportState {
        self.state.borrow().clone()
    }

    /// URI of the bound source
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    /// Generation of the bound source
    pub fn generation(&self) -> Generation {
        self.state.borrow().generation
    }

    /// Whether the last request was play
    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Last requested volume
    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    /// Every seek target, in order
    pub fn seeks(&self) -> Vec<f64> {
        self.state.borrow().seeks.clone()
    }
}

impl Transport for MemoryTransport {
    fn set_source(&mut self, uri: &str, generation: Generation) {
        let mut state = self.state.borrow_mut();
        state.source = Some(uri.to_string());
        state.generation = generation;
        state.position_secs = 0.0;
        state.loads += 1;
        // Binding a new source stops the old one, like a media element does
        state.playing = false;
    }

    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.play_requests += 1;
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, position_secs: f64) {
        let mut state = self.state.borrow_mut();
        state.position_secs = position_secs;
        state.seeks.push(position_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }
}

//! `HTMLAudioElement` transport

use crate::transport::{Generation, Transport};
use tracing::{debug, warn};
use web_sys::HtmlAudioElement;

/// Transport backed by a page's `<audio>` element
///
/// Clones drive the same element.
#[derive(Debug, Clone)]
pub struct HtmlAudioTransport {
    audio: HtmlAudioElement,
}

impl HtmlAudioTransport {
    /// Wrap an existing element
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }

    /// The wrapped element
    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl Transport for HtmlAudioTransport {
    fn set_source(&mut self, uri: &str, generation: Generation) {
        debug!(uri, generation = %generation, "Binding audio source");
        self.audio.set_src(uri);
    }

    fn play(&mut self) {
        // The returned promise rejects on autoplay policy; the element stays paused
        if let Err(err) = self.audio.play() {
            warn!(error = ?err, "Audio element refused to play");
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.audio.pause() {
            warn!(error = ?err, "Audio element refused to pause");
        }
    }

    fn seek(&mut self, position_secs: f64) {
        self.audio.set_current_time(position_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(f64::from(volume));
    }
}

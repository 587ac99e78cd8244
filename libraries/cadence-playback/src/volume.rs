//! Transport volume level
//!
//! The media element takes a linear level in `[0, 1]`; the slider in the UI
//! drives it directly, so no perceptual curve is applied here.

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Linear level (0.0 - 1.0)
    level: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial level, clamped to `[0, 1]` (NaN becomes full volume)
    pub fn new(level: f32) -> Self {
        let mut volume = Self::default();
        volume.set_level(level);
        volume
    }

    /// Set level, clamped to `[0, 1]`
    ///
    /// Returns `false` and keeps the previous level when `level` is NaN.
    pub fn set_level(&mut self, level: f32) -> bool {
        if level.is_nan() {
            return false;
        }
        self.level = level.clamp(0.0, 1.0);
        true
    }

    /// Get current level (0.0 - 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self { level: 1.0 }
    }
}

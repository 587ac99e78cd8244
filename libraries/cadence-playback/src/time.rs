//! Time display helpers

/// Format seconds as `M:SS`
///
/// Minutes are not wrapped into hours: one hour is `60:00`. Input the media
/// layer has not resolved yet (NaN, infinity, negative) formats as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

/// Fraction of the track played, in `[0, 1]`
///
/// Returns 0 while the duration is unknown, zero or not finite.
pub fn progress_fraction(current_time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current_time.is_finite() {
        return 0.0;
    }

    (current_time / duration).clamp(0.0, 1.0)
}

/// A duration the engine can do arithmetic with
pub(crate) fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

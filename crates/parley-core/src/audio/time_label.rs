/// Formats seconds as `m:ss`, flooring fractional seconds.
///
/// Negative and non-finite inputs render as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Fraction of a clip already played, clamped to `[0, 1]`.
///
/// A zero, negative or unknown total yields `0.0` rather than a non-finite
/// value.
pub fn progress_fraction(position_secs: f64, total_secs: f64) -> f64 {
    if !total_secs.is_finite() || total_secs <= 0.0 || !position_secs.is_finite() {
        return 0.0;
    }
    (position_secs / total_secs).clamp(0.0, 1.0)
}

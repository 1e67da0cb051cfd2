//! Pure values derived from timer state for the presentation layer.

/// `MM:SS`, both fields zero-padded.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `elapsed / total`, clamped to `0.0..=1.0`.
pub fn progress_fraction(elapsed_secs: u32, total_secs: u32) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    (f64::from(elapsed_secs) / f64::from(total_secs)).min(1.0)
}

/// `min(floor(elapsed / (total / segments)), segments - 1)`.
///
/// Computed as `elapsed * segments / total` so uneven splits (90 s over
/// 8 body parts) are not rounded before the division.
pub fn segment_index(elapsed_secs: u32, total_secs: u32, segments: u32) -> usize {
    if total_secs == 0 || segments == 0 {
        return 0;
    }
    let raw = u64::from(elapsed_secs) * u64::from(segments) / u64::from(total_secs);
    raw.min(u64::from(segments - 1)) as usize
}

/// Index that advances every `period_secs` and wraps at `modulus`.
pub fn rotating_index(elapsed_secs: u32, period_secs: u32, modulus: usize) -> usize {
    if period_secs == 0 || modulus == 0 {
        return 0;
    }
    (elapsed_secs / period_secs) as usize % modulus
}

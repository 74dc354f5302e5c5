//! Derived-field calculations for progress records.

/// Clamp a percentage into the [0, 100] range.
pub fn clamp_percentage(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Cumulative progress as a percentage of the overall target.
///
/// Previous-year cumulative progress plus this period's progress applied
/// against the *remaining* gap, so the result can never exceed 100 even when
/// the raw inputs sum past it:
///
/// ```text
/// prev + current * (100 - prev) / 100
/// ```
///
/// Inputs are clamped to [0, 100] first; callers pass raw user values.
pub fn cumulative_progress_percentage(prev_dec_pct: f64, current_period_pct: f64) -> f64 {
    let prev = clamp_percentage(prev_dec_pct);
    let current = clamp_percentage(current_period_pct);
    clamp_percentage(prev + current * (100.0 - prev) / 100.0)
}

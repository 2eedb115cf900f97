//! Shared numeric helpers
//!
//! Every index in the engine is clamped before it feeds a logarithm, power or square
//! root. Those guards live here so the formula modules read like the published
//! equations.

/// Clamp to `[0, 1]`. NaN maps to 0 so a bad upstream scalar cannot poison a score.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Scale `value` by `cap` and clamp into `[0, 1]`
///
/// ```
/// use fire_danger_core::numeric::normalize_to_cap;
///
/// assert_eq!(normalize_to_cap(100.0, 200.0), 0.5);
/// assert_eq!(normalize_to_cap(900.0, 200.0), 1.0);
/// assert_eq!(normalize_to_cap(-5.0, 200.0), 0.0);
/// ```
#[inline]
pub fn normalize_to_cap(value: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        return 0.0;
    }
    clamp_unit(value / cap)
}

/// Floor at zero (NaN maps to zero)
#[inline]
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Use `default` when a provider scalar is missing or not finite
#[inline]
pub fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Wrap an angle into the compass range `[0, 360)`
///
/// Periodic: `normalize_bearing(x) == normalize_bearing(x + 360·k)` up to rounding.
#[inline]
pub fn normalize_bearing(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

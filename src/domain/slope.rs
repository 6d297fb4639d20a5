//! Least-squares slope over a numeric window.
//!
//! Used for the volume-MA and MA60 trend checks. Degenerate inputs resolve
//! to a slope of 0 so rule evaluation never aborts mid-stream.

/// Ordinary least-squares slope of `values` against indices 0..n-1.
///
/// Returns 0.0 when fewer than two points are given, when any value is
/// non-finite, or when the normal-equation denominator vanishes.
pub fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = n_f * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }
    (n_f * sum_xy - sum_x * sum_y) / denom
}

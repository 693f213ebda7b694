//! Trend change-point detection from local regression slopes.
//!
//! A sample is a change point when the trend over the `window` samples
//! before it and the trend over the `window` samples after it point in
//! opposite directions, and the jump between the two slopes is large
//! relative to the typical local slope of the whole series.

use crate::errors::{validate_data_length, validate_finite, ForecastError, ForecastResult};
use crate::math_utils::{constants::RELATIVE_SLOPE_TOLERANCE, regression_slope};
use crate::series::TimeSeriesPoint;

/// Default number of samples on each side of a candidate.
pub const DEFAULT_CHANGE_POINT_WINDOW: usize = 3;
/// Default sensitivity multiplier.
pub const DEFAULT_CHANGE_POINT_THRESHOLD: f64 = 1.0;

/// Detect samples where the local trend reverses.
///
/// For each candidate `i` in `window..n - window` the slope of
/// `points[i - window..i]` is compared with the slope of
/// `points[i + 1..=i + window]`. The candidate is flagged when the slopes
/// have strictly opposite signs and `|after - before|` exceeds
/// `threshold` times the mean absolute slope of every `window`-length
/// stretch of the series. Flagged points are returned in chronological
/// order.
///
/// # Errors
/// * `InvalidParameter` if `window < 2` or `threshold` is negative or non-finite
/// * `InsufficientData` if `n < 2 * window + 1`
pub fn detect_trend_changes(
    points: &[TimeSeriesPoint],
    window: usize,
    threshold: f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    if window < 2 {
        return Err(ForecastError::invalid_parameter(
            "window",
            window as f64,
            "at least 2 samples",
        ));
    }
    validate_finite(threshold, "threshold")?;
    if threshold < 0.0 {
        return Err(ForecastError::invalid_parameter(
            "threshold",
            threshold,
            "non-negative",
        ));
    }
    validate_data_length(
        points.len(),
        window.saturating_mul(2).saturating_add(1),
        "trend change detection",
    )?;

    // local[s] is the slope of points[s..s + window]
    let local = points
        .windows(window)
        .map(regression_slope)
        .collect::<ForecastResult<Vec<f64>>>()?;

    let mean_abs_slope = local.iter().map(|s| s.abs()).sum::<f64>() / local.len() as f64;
    let mean_abs_value = points.iter().map(|p| p.value().abs()).sum::<f64>() / points.len() as f64;
    if mean_abs_slope <= RELATIVE_SLOPE_TOLERANCE * mean_abs_value {
        log::debug!("Series has no local trend; no change points");
        return Ok(Vec::new());
    }
    let min_jump = threshold * mean_abs_slope;

    let changes = (window..points.len() - window)
        .filter(|&i| {
            let before = local[i - window];
            let after = local[i + 1];
            before * after < 0.0 && (after - before).abs() > min_jump
        })
        .map(|i| points[i])
        .collect();

    Ok(changes)
}

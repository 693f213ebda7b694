//! Seasonality measurement and removal.
//!
//! Strength is the lag-`p` autocorrelation of the series. Adjustment removes
//! the per-phase average (the seasonal component) from every sample.

use crate::errors::{validate_data_length, ForecastError, ForecastResult};
use crate::math_utils::autocorrelation;
use crate::series::{values, TimeSeriesPoint};

/// Strength above which a period is considered materially seasonal.
pub const DEFAULT_SEASONALITY_THRESHOLD: f64 = 0.5;

fn validate_period(points: &[TimeSeriesPoint], period: usize, operation: &str) -> ForecastResult<()> {
    if period == 0 {
        return Err(ForecastError::invalid_parameter(
            "period",
            0.0,
            "at least 1 sample",
        ));
    }
    validate_data_length(points.len(), period.saturating_mul(2), operation)
}

/// Seasonality strength at `period`: the raw lag-`period` autocorrelation.
///
/// Interpretation is left to the caller; see [`is_seasonal`].
///
/// # Errors
/// * `InvalidParameter` if `period` is zero
/// * `InsufficientData` unless the series holds two full periods
pub fn seasonality_strength(points: &[TimeSeriesPoint], period: usize) -> ForecastResult<f64> {
    validate_period(points, period, "seasonality strength")?;
    autocorrelation(&values(points), period)
}

/// Whether a measured strength indicates material seasonality.
pub fn is_seasonal(strength: f64, threshold: f64) -> bool {
    strength > threshold
}

/// Average value of each phase `0..period`.
///
/// Phase `j` averages every sample whose index modulo `period` equals `j`.
///
/// # Errors
/// Same as [`seasonal_adjustment`].
pub fn seasonal_components(points: &[TimeSeriesPoint], period: usize) -> ForecastResult<Vec<f64>> {
    validate_period(points, period, "seasonal components")?;

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, p) in points.iter().enumerate() {
        sums[i % period] += p.value();
        counts[i % period] += 1;
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| sum / count as f64)
        .collect())
}

/// Remove the seasonal component from every sample.
///
/// The result has the same length and timestamps as the input.
///
/// Phase means absorb any trend, so a trending series comes back as a
/// per-cycle staircase whose lag-`period` strength stays near 1. Detrend
/// first (for example by subtracting [`linear_fit`](crate::math_utils::linear_fit))
/// when the series drifts.
///
/// # Errors
/// * `InvalidParameter` if `period` is zero
/// * `InsufficientData` unless the series holds two full periods
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::seasonality::{seasonal_adjustment, seasonality_strength};
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let raw: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 10.0 } else { 20.0 }).collect();
/// let series = series_from_values(start, Duration::days(1), &raw).unwrap();
///
/// let adjusted = seasonal_adjustment(&series, 2).unwrap();
/// let before = seasonality_strength(&series, 2).unwrap();
/// let after = seasonality_strength(&adjusted, 2).unwrap();
/// assert!(after.abs() < before.abs());
/// ```
pub fn seasonal_adjustment(
    points: &[TimeSeriesPoint],
    period: usize,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    let components = seasonal_components(points, period)?;

    Ok(points
        .iter()
        .enumerate()
        .map(|(i, p)| TimeSeriesPoint::derived(p.timestamp(), p.value() - components[i % period]))
        .collect())
}

//! Cyclical-pattern mining over candidate periods.

use crate::errors::{validate_data_length, validate_parameter, ForecastError, ForecastResult};
use crate::math_utils::autocorrelation;
use crate::series::{values, TimeSeriesPoint};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Largest period scanned by default.
pub const DEFAULT_MAX_PERIOD: usize = 20;
/// Smallest absolute autocorrelation reported by default.
pub const DEFAULT_MIN_STRENGTH: f64 = 0.1;
/// Fewest samples that can evaluate period 2.
pub const MIN_CYCLE_SAMPLES: usize = 4;

/// A repeating pattern found in a series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CyclicalPattern {
    /// Cycle length in samples
    pub period: usize,
    /// Lag-`period` autocorrelation, in `[-1, 1]`
    pub strength: f64,
}

/// Find periods whose autocorrelation magnitude reaches `min_strength`.
///
/// Candidate periods run from 2 to `min(max_period, n / 2)`. Results are
/// ordered by descending `|strength|`, ties broken by the shorter period.
///
/// # Errors
/// * `InsufficientData` for fewer than [`MIN_CYCLE_SAMPLES`] points
/// * `InvalidParameter` if `max_period < 2` or `min_strength` is outside `[0, 1]`
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::cycles::find_cyclical_patterns;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let raw: Vec<f64> = (0..28).map(|i| [5.0, 9.0, 7.0, 1.0][i % 4]).collect();
/// let series = series_from_values(start, Duration::days(1), &raw).unwrap();
///
/// let patterns = find_cyclical_patterns(&series, 20, 0.1).unwrap();
/// assert_eq!(patterns[0].period, 4);
/// ```
pub fn find_cyclical_patterns(
    points: &[TimeSeriesPoint],
    max_period: usize,
    min_strength: f64,
) -> ForecastResult<Vec<CyclicalPattern>> {
    if max_period < 2 {
        return Err(ForecastError::invalid_parameter(
            "max_period",
            max_period as f64,
            "at least 2",
        ));
    }
    validate_parameter(min_strength, 0.0, 1.0, "min_strength")?;
    validate_data_length(points.len(), MIN_CYCLE_SAMPLES, "cyclical pattern search")?;

    let data = values(points);
    let upper = max_period.min(data.len() / 2);

    let mut patterns = scan_periods(&data, upper)?
        .into_iter()
        .filter(|p| p.strength.abs() >= min_strength)
        .collect::<Vec<_>>();

    patterns.sort_by(|a, b| {
        b.strength
            .abs()
            .partial_cmp(&a.strength.abs())
            .unwrap_or(Ordering::Equal)
            .then(a.period.cmp(&b.period))
    });

    Ok(patterns)
}

/// Find cyclical patterns with the default period range and strength cut-off.
pub fn find_cyclical_patterns_default(
    points: &[TimeSeriesPoint],
) -> ForecastResult<Vec<CyclicalPattern>> {
    find_cyclical_patterns(points, DEFAULT_MAX_PERIOD, DEFAULT_MIN_STRENGTH)
}

#[cfg(feature = "parallel")]
fn scan_periods(data: &[f64], upper: usize) -> ForecastResult<Vec<CyclicalPattern>> {
    use rayon::prelude::*;
    (2..=upper)
        .into_par_iter()
        .map(|period| {
            autocorrelation(data, period).map(|strength| CyclicalPattern { period, strength })
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn scan_periods(data: &[f64], upper: usize) -> ForecastResult<Vec<CyclicalPattern>> {
    (2..=upper)
        .map(|period| {
            autocorrelation(data, period).map(|strength| CyclicalPattern { period, strength })
        })
        .collect()
}

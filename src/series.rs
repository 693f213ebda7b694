//! Time-series sample type and batch construction helpers.
//!
//! [`TimeSeriesPoint`] is the unit every engine function consumes and
//! produces. Its value is checked for finiteness once, when the point is
//! built, so the analysis functions never re-validate their input.

use crate::errors::{validate_all_finite, validate_finite, ForecastError, ForecastResult};
use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Milliseconds in one day, the unit of the regression time axis.
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A single timestamped observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeriesPoint {
    timestamp: DateTime<Utc>,
    value: f64,
}

impl TimeSeriesPoint {
    /// Create a point, rejecting NaN and infinite values.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> ForecastResult<Self> {
        validate_finite(value, "value")?;
        Ok(Self { timestamp, value })
    }

    /// Internal constructor for values derived from already validated points.
    pub(crate) fn derived(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Observation instant.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Observed value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Build a uniformly spaced series starting at `start`.
///
/// # Errors
/// `InvalidParameter` if any value is non-finite, if `interval` is not
/// positive, or if a timestamp would overflow the calendar.
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let series = series_from_values(start, Duration::days(1), &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(series.len(), 3);
/// assert_eq!(series[2].timestamp(), start + Duration::days(2));
/// ```
pub fn series_from_values(
    start: DateTime<Utc>,
    interval: Duration,
    values: &[f64],
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_interval(interval)?;
    validate_all_finite(values, "values")?;

    let mut points = Vec::with_capacity(values.len());
    let mut timestamp = start;
    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            timestamp = advance(timestamp, interval)?;
        }
        points.push(TimeSeriesPoint::derived(timestamp, value));
    }
    Ok(points)
}

/// Extract the values of a series in order.
pub fn values(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(TimeSeriesPoint::value).collect()
}

/// Elapsed time of every point since the first one, in fractional days.
pub fn elapsed_days(points: &[TimeSeriesPoint]) -> Vec<f64> {
    match points.first() {
        Some(first) => points
            .iter()
            .map(|p| days_between(first.timestamp, p.timestamp))
            .collect(),
        None => Vec::new(),
    }
}

/// Signed number of days from `from` to `to`.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Reject zero or negative sampling intervals.
pub(crate) fn validate_interval(interval: Duration) -> ForecastResult<()> {
    if interval <= Duration::zero() {
        return Err(ForecastError::invalid_parameter(
            "interval",
            interval.num_milliseconds() as f64,
            "positive duration",
        ));
    }
    Ok(())
}

/// Advance a timestamp, reporting calendar overflow as an invalid interval.
pub(crate) fn advance(timestamp: DateTime<Utc>, interval: Duration) -> ForecastResult<DateTime<Utc>> {
    timestamp.checked_add_signed(interval).ok_or_else(|| {
        ForecastError::invalid_parameter(
            "interval",
            interval.num_milliseconds() as f64,
            "timestamps within the representable calendar range",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_point_rejects_non_finite_values() {
        assert!(TimeSeriesPoint::new(start(), 1.0).is_ok());
        assert!(matches!(
            TimeSeriesPoint::new(start(), f64::NAN),
            Err(ForecastError::InvalidParameter { .. })
        ));
        assert!(matches!(
            TimeSeriesPoint::new(start(), f64::INFINITY),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_series_from_values_spacing() {
        let series = series_from_values(start(), Duration::hours(12), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].timestamp(), start() + Duration::hours(12));
        assert_eq!(values(&series), vec![1.0, 2.0, 3.0]);

        let days = elapsed_days(&series);
        assert_approx_eq!(days[0], 0.0, 1e-12);
        assert_approx_eq!(days[2], 1.0, 1e-12);
    }

    #[test]
    fn test_series_from_values_rejects_bad_input() {
        assert!(matches!(
            series_from_values(start(), Duration::zero(), &[1.0]),
            Err(ForecastError::InvalidParameter { .. })
        ));
        assert!(matches!(
            series_from_values(start(), Duration::days(1), &[1.0, f64::NAN]),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_elapsed_days_empty() {
        assert!(elapsed_days(&[]).is_empty());
    }
}

//! Baseline forecast generators.
//!
//! Both generators step forward from the last observed timestamp by a fixed
//! interval. The persistence forecast repeats the last observation; the
//! linear-trend forecast extends the least-squares line of the full series.

use crate::errors::{validate_data_length, ForecastResult};
use crate::math_utils::linear_fit;
use crate::series::{advance, days_between, validate_interval, TimeSeriesPoint};
use chrono::{DateTime, Duration, Utc};

/// Default forecast horizon, in intervals.
pub const DEFAULT_FORECAST_PERIODS: usize = 12;

fn future_timestamps(
    last: DateTime<Utc>,
    periods: usize,
    interval: Duration,
) -> ForecastResult<Vec<DateTime<Utc>>> {
    validate_interval(interval)?;

    let mut stamps = Vec::with_capacity(periods);
    let mut current = last;
    for _ in 0..periods {
        current = advance(current, interval)?;
        stamps.push(current);
    }
    Ok(stamps)
}

/// Flat extrapolation of the last observed value.
///
/// # Errors
/// * `InsufficientData` for an empty series
/// * `InvalidParameter` if `interval` is not positive
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::forecast::persistence_forecast;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let series = series_from_values(start, Duration::days(1), &[4.0, 6.0]).unwrap();
/// let forecast = persistence_forecast(&series, 3, Duration::days(1)).unwrap();
/// assert!(forecast.iter().all(|p| p.value() == 6.0));
/// assert_eq!(forecast[2].timestamp(), start + Duration::days(4));
/// ```
pub fn persistence_forecast(
    points: &[TimeSeriesPoint],
    periods: usize,
    interval: Duration,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_data_length(points.len(), 1, "persistence forecast")?;
    let last = points[points.len() - 1];

    Ok(future_timestamps(last.timestamp(), periods, interval)?
        .into_iter()
        .map(|ts| TimeSeriesPoint::derived(ts, last.value()))
        .collect())
}

/// Extend the least-squares trend line of the whole series.
///
/// Values at uniformly spaced future timestamps have constant first
/// differences.
///
/// # Errors
/// * `InsufficientData` for fewer than 2 points
/// * `InvalidParameter` if `interval` is not positive
pub fn linear_trend_forecast(
    points: &[TimeSeriesPoint],
    periods: usize,
    interval: Duration,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    let fit = linear_fit(points)?;
    let origin = points[0].timestamp();
    let last = points[points.len() - 1].timestamp();

    Ok(future_timestamps(last, periods, interval)?
        .into_iter()
        .map(|ts| TimeSeriesPoint::derived(ts, fit.predict(days_between(origin, ts))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ForecastError;
    use crate::series::series_from_values;
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn weekly(values: &[f64]) -> Vec<TimeSeriesPoint> {
        series_from_values(start(), Duration::weeks(1), values).unwrap()
    }

    #[test]
    fn test_persistence_repeats_last_value() {
        let points = weekly(&[310.0, 295.0, 302.5]);
        let forecast = persistence_forecast(&points, 4, Duration::weeks(1)).unwrap();
        assert_eq!(forecast.len(), 4);
        for (k, p) in forecast.iter().enumerate() {
            assert_eq!(p.value(), 302.5);
            assert_eq!(
                p.timestamp(),
                points[2].timestamp() + Duration::weeks(k as i64 + 1)
            );
        }
    }

    #[test]
    fn test_zero_periods_is_empty() {
        let points = weekly(&[1.0, 2.0]);
        assert!(persistence_forecast(&points, 0, Duration::weeks(1)).unwrap().is_empty());
        assert!(linear_trend_forecast(&points, 0, Duration::weeks(1)).unwrap().is_empty());
    }

    #[test]
    fn test_linear_trend_extends_line() {
        // 7 units per week is one unit per day
        let points = weekly(&[100.0, 107.0, 114.0, 121.0]);
        let forecast = linear_trend_forecast(&points, 3, Duration::weeks(1)).unwrap();
        assert_approx_eq!(forecast[0].value(), 128.0, 1e-9);
        assert_approx_eq!(forecast[2].value(), 142.0, 1e-9);
    }

    #[test]
    fn test_linear_trend_constant_differences() {
        let points = weekly(&[40.0, 38.5, 41.0, 37.0, 36.5, 35.0, 36.0, 33.5]);
        let forecast = linear_trend_forecast(&points, 10, Duration::weeks(1)).unwrap();
        let diffs: Vec<f64> = forecast.windows(2).map(|w| w[1].value() - w[0].value()).collect();
        for d in &diffs {
            assert_approx_eq!(*d, diffs[0], 1e-9);
        }
        assert!(diffs[0] < 0.0);
    }

    #[test]
    fn test_forecast_errors() {
        assert!(matches!(
            persistence_forecast(&[], 3, Duration::days(1)),
            Err(ForecastError::InsufficientData { required: 1, actual: 0 })
        ));
        let single = weekly(&[5.0]);
        assert!(matches!(
            linear_trend_forecast(&single, 3, Duration::days(1)),
            Err(ForecastError::InsufficientData { required: 2, actual: 1 })
        ));
        let points = weekly(&[5.0, 6.0]);
        assert!(matches!(
            persistence_forecast(&points, 3, Duration::zero()),
            Err(ForecastError::InvalidParameter { .. })
        ));
        assert!(matches!(
            linear_trend_forecast(&points, 3, Duration::days(-1)),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }
}

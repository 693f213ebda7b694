//! Z-score anomaly detection.

use crate::errors::{validate_data_length, validate_finite, ForecastError, ForecastResult};
use crate::math_utils::{is_negligible_variance, mean_and_std_dev};
use crate::series::{values, TimeSeriesPoint};

/// Default absolute z-score above which a reading is anomalous.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;

/// Z-score of every point against the series mean and population standard deviation.
///
/// A constant series scores 0 everywhere.
///
/// # Errors
/// `InsufficientData` for an empty series.
pub fn z_scores(points: &[TimeSeriesPoint]) -> ForecastResult<Vec<f64>> {
    validate_data_length(points.len(), 1, "z-score")?;
    let data = values(points);
    let (mean, std_dev) = mean_and_std_dev(&data)?;

    if is_negligible_variance(std_dev * std_dev, mean) {
        return Ok(vec![0.0; data.len()]);
    }
    Ok(data.iter().map(|v| (v - mean) / std_dev).collect())
}

/// Return every point whose absolute z-score exceeds `threshold`.
///
/// The mean and standard deviation are computed once over the whole
/// series. Flagged points are returned unchanged, in their original order.
/// A constant series has no anomalies.
///
/// # Errors
/// * `InvalidParameter` if `threshold` is negative or non-finite
/// * `InsufficientData` for an empty series
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::anomaly::detect_anomalies;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let mut raw = vec![100.0; 20];
/// raw[7] = 400.0;
/// let series = series_from_values(start, Duration::days(1), &raw).unwrap();
///
/// let anomalies = detect_anomalies(&series, 3.0).unwrap();
/// assert_eq!(anomalies.len(), 1);
/// assert_eq!(anomalies[0].value(), 400.0);
/// ```
pub fn detect_anomalies(
    points: &[TimeSeriesPoint],
    threshold: f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_finite(threshold, "threshold")?;
    if threshold < 0.0 {
        return Err(ForecastError::invalid_parameter(
            "threshold",
            threshold,
            "non-negative",
        ));
    }

    let scores = z_scores(points)?;
    if scores.iter().all(|&z| z == 0.0) {
        log::debug!("Zero-variance series of {} points, no anomalies", points.len());
    }

    Ok(points
        .iter()
        .zip(scores)
        .filter(|(_, z)| z.abs() > threshold)
        .map(|(p, _)| *p)
        .collect())
}

//! Core statistical primitives shared by every analysis module.
//!
//! Population moments, ordinary least squares over the elapsed-time axis and
//! lag-k autocorrelation. Everything else in the crate is built on these.

use crate::errors::{validate_data_length, ForecastResult};
use crate::series::{elapsed_days, TimeSeriesPoint};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numerical tolerances used across the crate.
pub mod constants {
    /// Variance at or below this fraction of the squared mean counts as zero
    pub const RELATIVE_VARIANCE_TOLERANCE: f64 = 1e-15;

    /// Spread of the time axis, in squared days, below which all samples share one instant
    pub const MIN_TIME_AXIS_VARIANCE: f64 = 1e-15;

    /// Mean absolute slope per day at or below this fraction of the mean
    /// absolute value counts as flat
    pub const RELATIVE_SLOPE_TOLERANCE: f64 = 1e-12;

    /// Minimum paired samples for a lagged correlation
    pub const MIN_AUTOCORRELATION_OVERLAP: usize = 2;
}

/// Safe floating point comparison functions
pub mod float_ops {
    /// Check if two floating point numbers are approximately equal with custom epsilon
    #[inline]
    pub fn approx_eq_eps(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// Check if a floating point number is approximately zero with custom epsilon
    #[inline]
    pub fn approx_zero_eps(x: f64, epsilon: f64) -> bool {
        x.abs() < epsilon
    }
}

/// Kahan compensated summation.
///
/// Keeps long consumption series (years of hourly readings) from drifting
/// when large and small magnitudes are mixed.
pub fn kahan_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut c = 0.0;

    for &value in values {
        let y = value - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }

    sum
}

/// Arithmetic mean of a non-empty slice.
///
/// # Example
/// ```rust
/// use energy_forecast::math_utils::mean;
///
/// assert!((mean(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
/// assert!(mean(&[]).is_err());
/// ```
pub fn mean(data: &[f64]) -> ForecastResult<f64> {
    validate_data_length(data.len(), 1, "mean")?;
    Ok(kahan_sum(data) / data.len() as f64)
}

/// Population variance (divides by `n`).
///
/// # Example
/// ```rust
/// use energy_forecast::math_utils::population_variance;
///
/// let variance = population_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert!((variance - 2.0).abs() < 1e-12);
/// ```
pub fn population_variance(data: &[f64]) -> ForecastResult<f64> {
    let mu = mean(data)?;
    Ok(sum_squared_deviations(data, mu) / data.len() as f64)
}

/// Population standard deviation.
pub fn population_std_dev(data: &[f64]) -> ForecastResult<f64> {
    Ok(population_variance(data)?.sqrt())
}

/// Mean and population standard deviation in one pass over the moments.
pub fn mean_and_std_dev(data: &[f64]) -> ForecastResult<(f64, f64)> {
    let mu = mean(data)?;
    let variance = sum_squared_deviations(data, mu) / data.len() as f64;
    Ok((mu, variance.sqrt()))
}

fn sum_squared_deviations(data: &[f64], mu: f64) -> f64 {
    data.iter()
        .map(|x| {
            let d = x - mu;
            d * d
        })
        .sum()
}

/// Least-squares line over `(elapsed_days, value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFit {
    /// Change in value per day
    pub slope: f64,
    /// Fitted value at the first sample's timestamp
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the fitted line `elapsed_days` after the first sample.
    pub fn predict(&self, elapsed_days: f64) -> f64 {
        self.intercept + self.slope * elapsed_days
    }
}

/// Ordinary least squares fit of value against elapsed days.
///
/// The series is centred before the sums are formed, which avoids
/// cancellation when timestamps are far from the first sample. A perfectly
/// flat series has a slope of exactly zero. If every sample shares one
/// timestamp the time axis is degenerate; the fit is then flat through the
/// mean.
///
/// # Errors
/// `InsufficientData` for fewer than 2 points.
pub fn linear_fit(points: &[TimeSeriesPoint]) -> ForecastResult<LinearFit> {
    validate_data_length(points.len(), 2, "linear regression")?;

    let x = elapsed_days(points);
    let y: Vec<f64> = points.iter().map(TimeSeriesPoint::value).collect();
    let n = y.len() as f64;

    let mean_x = kahan_sum(&x) / n;
    let mean_y = kahan_sum(&y) / n;

    let first = y[0];
    if y.iter().all(|&v| v == first) {
        return Ok(LinearFit {
            slope: 0.0,
            intercept: first,
        });
    }

    let (sxy, sxx) = x
        .iter()
        .zip(&y)
        .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

    if float_ops::approx_zero_eps(sxx, constants::MIN_TIME_AXIS_VARIANCE) {
        log::warn!(
            "Degenerate time axis: {} samples share one timestamp, using a flat fit",
            points.len()
        );
        return Ok(LinearFit {
            slope: 0.0,
            intercept: mean_y,
        });
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Whether `variance` is rounding noise around `mean` rather than spread.
///
/// The cut-off scales with the data, so readings in any unit behave alike.
pub fn is_negligible_variance(variance: f64, mean: f64) -> bool {
    variance <= constants::RELATIVE_VARIANCE_TOLERANCE * mean * mean
}

/// Least-squares slope of value against elapsed days.
///
/// # Errors
/// `InsufficientData` for fewer than 2 points.
pub fn regression_slope(points: &[TimeSeriesPoint]) -> ForecastResult<f64> {
    Ok(linear_fit(points)?.slope)
}

/// Pearson correlation of a series with itself shifted by `lag` samples.
///
/// The correlation is taken over the overlap `data[..n-lag]` against
/// `data[lag..]`, each side centred on its own mean. A side with no
/// variance correlates with nothing, so the result is 0.
///
/// # Errors
/// `InsufficientData` when fewer than 2 paired samples remain after the shift.
///
/// # Example
/// ```rust
/// use energy_forecast::math_utils::autocorrelation;
///
/// let data = vec![10.0, 20.0, 10.0, 20.0, 10.0, 20.0];
/// let r = autocorrelation(&data, 2).unwrap();
/// assert!((r - 1.0).abs() < 1e-10);
/// ```
pub fn autocorrelation(data: &[f64], lag: usize) -> ForecastResult<f64> {
    let required = lag.saturating_add(constants::MIN_AUTOCORRELATION_OVERLAP);
    validate_data_length(data.len(), required, "autocorrelation")?;

    let n = data.len();
    let head = &data[..n - lag];
    let tail = &data[lag..];
    let len = head.len() as f64;

    let mean_head = kahan_sum(head) / len;
    let mean_tail = kahan_sum(tail) / len;

    let (cov, var_head, var_tail) = head.iter().zip(tail).fold(
        (0.0, 0.0, 0.0),
        |(cov, vh, vt), (a, b)| {
            let da = a - mean_head;
            let db = b - mean_tail;
            (cov + da * db, vh + da * da, vt + db * db)
        },
    );

    if is_negligible_variance(var_head / len, mean_head)
        || is_negligible_variance(var_tail / len, mean_tail)
    {
        return Ok(0.0);
    }

    // sqrt of the product keeps identical segments at exactly 1
    let r = cov / (var_head * var_tail).sqrt();
    Ok(r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ForecastError;
    use crate::series::series_from_values;
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn daily(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        series_from_values(start, Duration::days(1), values).unwrap()
    }

    #[test]
    fn test_mean_and_population_variance() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx_eq!(mean(&data).unwrap(), 5.0, 1e-12);
        assert_approx_eq!(population_variance(&data).unwrap(), 4.0, 1e-12);
        assert_approx_eq!(population_std_dev(&data).unwrap(), 2.0, 1e-12);

        let (mu, sd) = mean_and_std_dev(&data).unwrap();
        assert_approx_eq!(mu, 5.0, 1e-12);
        assert_approx_eq!(sd, 2.0, 1e-12);
    }

    #[test]
    fn test_moments_reject_empty_input() {
        assert!(matches!(
            mean(&[]),
            Err(ForecastError::InsufficientData { required: 1, actual: 0 })
        ));
        assert!(matches!(
            population_variance(&[]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_kahan_sum_precision() {
        let mut values = vec![1e16];
        values.extend(std::iter::repeat(1.0).take(1000));
        values.push(-1e16);
        assert_approx_eq!(kahan_sum(&values), 1000.0, 1e-6);
    }

    #[test]
    fn test_regression_slope_perfect_line() {
        let points = daily(&[3.0, 5.0, 7.0, 9.0, 11.0]);
        let fit = linear_fit(&points).unwrap();
        assert_approx_eq!(fit.slope, 2.0, 1e-10);
        assert_approx_eq!(fit.intercept, 3.0, 1e-10);
        assert_approx_eq!(fit.predict(10.0), 23.0, 1e-10);
    }

    #[test]
    fn test_regression_slope_uses_day_units() {
        let start = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        let points = series_from_values(start, Duration::hours(6), &[0.0, 1.0, 2.0, 3.0]).unwrap();
        // One unit per six hours is four units per day
        assert_approx_eq!(regression_slope(&points).unwrap(), 4.0, 1e-10);
    }

    #[test]
    fn test_regression_slope_flat_series_is_zero() {
        let points = daily(&[0.1, 0.1, 0.1, 0.1]);
        assert_eq!(regression_slope(&points).unwrap(), 0.0);
    }

    #[test]
    fn test_regression_requires_two_points() {
        let points = daily(&[1.0]);
        assert!(matches!(
            regression_slope(&points),
            Err(ForecastError::InsufficientData { required: 2, actual: 1 })
        ));
        assert!(matches!(
            regression_slope(&[]),
            Err(ForecastError::InsufficientData { required: 2, actual: 0 })
        ));
    }

    #[test]
    fn test_regression_degenerate_time_axis() {
        let ts = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        let points = vec![
            TimeSeriesPoint::new(ts, 1.0).unwrap(),
            TimeSeriesPoint::new(ts, 3.0).unwrap(),
        ];
        let fit = linear_fit(&points).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_approx_eq!(fit.intercept, 2.0, 1e-12);
    }

    #[test]
    fn test_autocorrelation_periodic_series() {
        let data: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 10.0 } else { 20.0 }).collect();
        assert_approx_eq!(autocorrelation(&data, 2).unwrap(), 1.0, 1e-10);
        assert_approx_eq!(autocorrelation(&data, 1).unwrap(), -1.0, 1e-10);
    }

    #[test]
    fn test_autocorrelation_constant_series_is_zero() {
        let data = vec![5.0; 10];
        assert_eq!(autocorrelation(&data, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_autocorrelation_is_unit_independent() {
        let tiny: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 1e-8 } else { 2e-8 }).collect();
        assert_approx_eq!(autocorrelation(&tiny, 1).unwrap(), -1.0, 1e-9);
        assert_approx_eq!(autocorrelation(&tiny, 2).unwrap(), 1.0, 1e-9);

        let flat = vec![1e-8; 12];
        assert_eq!(autocorrelation(&flat, 1).unwrap(), 0.0);
        assert!(is_negligible_variance(0.0, 0.0));
        assert!(!is_negligible_variance(1e-30, 0.0));
    }

    #[test]
    fn test_autocorrelation_bounds() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin() + 0.01 * i as f64).collect();
        for lag in 1..20 {
            let r = autocorrelation(&data, lag).unwrap();
            assert!((-1.0..=1.0).contains(&r), "lag {} gave {}", lag, r);
        }
    }

    #[test]
    fn test_autocorrelation_requires_overlap() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert!(autocorrelation(&data, 2).is_ok());
        assert!(matches!(
            autocorrelation(&data, 3),
            Err(ForecastError::InsufficientData { required: 5, actual: 4 })
        ));
        assert!(matches!(
            autocorrelation(&data, usize::MAX),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}

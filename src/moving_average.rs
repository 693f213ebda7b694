//! Simple, weighted and exponential moving averages.
//!
//! Windowed averages are trailing: each output carries the timestamp of the
//! latest sample in its window, so output `i` covers inputs `i..i + w`.

use crate::errors::{validate_data_length, validate_parameter, ForecastError, ForecastResult};
use crate::math_utils::{float_ops, kahan_sum};
use crate::series::TimeSeriesPoint;

/// Tolerance on the sum of moving-average weights.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Simple moving average over a window of `window` samples.
///
/// Output length is `n - window + 1`.
///
/// # Errors
/// * `InvalidParameter` if `window` is zero
/// * `InsufficientData` if the series is shorter than `window`
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::moving_average::simple_moving_average;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let series = series_from_values(start, Duration::days(1), &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let sma = simple_moving_average(&series, 2).unwrap();
/// assert_eq!(sma.len(), 3);
/// assert!((sma[0].value() - 1.5).abs() < 1e-12);
/// ```
pub fn simple_moving_average(
    points: &[TimeSeriesPoint],
    window: usize,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    if window == 0 {
        return Err(ForecastError::invalid_parameter(
            "window",
            0.0,
            "at least 1 sample",
        ));
    }
    validate_data_length(points.len(), window, "simple moving average")?;

    let width = window as f64;
    let out = points
        .windows(window)
        .map(|w| {
            let sum: f64 = w.iter().map(TimeSeriesPoint::value).sum();
            TimeSeriesPoint::derived(w[window - 1].timestamp(), sum / width)
        })
        .collect();

    Ok(out)
}

/// Weighted moving average with caller-supplied weights.
///
/// `weights[0]` multiplies the earliest sample in each window and the last
/// weight multiplies the latest. Weights must sum to 1 within
/// [`WEIGHT_SUM_TOLERANCE`]. Output length is `n - weights.len() + 1`.
///
/// # Errors
/// * `InvalidParameter` for empty or non-finite weights, or a weight sum
///   other than 1
/// * `InsufficientData` if the series is shorter than the weight vector
pub fn weighted_moving_average(
    points: &[TimeSeriesPoint],
    weights: &[f64],
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_weights(weights)?;
    let window = weights.len();
    validate_data_length(points.len(), window, "weighted moving average")?;

    let out = points
        .windows(window)
        .map(|w| {
            let weighted: f64 = w.iter().zip(weights).map(|(p, wt)| p.value() * wt).sum();
            TimeSeriesPoint::derived(w[window - 1].timestamp(), weighted)
        })
        .collect();

    Ok(out)
}

fn validate_weights(weights: &[f64]) -> ForecastResult<()> {
    if weights.is_empty() {
        return Err(ForecastError::invalid_parameter(
            "weights.len",
            0.0,
            "at least one weight",
        ));
    }
    if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
        return Err(ForecastError::invalid_parameter(
            format!("weights[{}]", i),
            weights[i],
            "finite value",
        ));
    }

    let total = kahan_sum(weights);
    if !float_ops::approx_eq_eps(total, 1.0, WEIGHT_SUM_TOLERANCE) {
        return Err(ForecastError::invalid_parameter(
            "weights.sum",
            total,
            format!("1 within {:e}", WEIGHT_SUM_TOLERANCE),
        ));
    }
    Ok(())
}

/// Exponential moving average with smoothing factor `alpha`.
///
/// The first output equals the first input; afterwards
/// `ema[i] = alpha * value[i] + (1 - alpha) * ema[i - 1]`. Output length
/// equals input length.
///
/// # Errors
/// * `InvalidParameter` if `alpha` is outside `(0, 1]`
/// * `InsufficientData` for an empty series
pub fn exponential_moving_average(
    points: &[TimeSeriesPoint],
    alpha: f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_parameter(alpha, 0.0, 1.0, "alpha")?;
    if alpha <= 0.0 {
        return Err(ForecastError::invalid_parameter("alpha", alpha, "(0, 1]"));
    }
    validate_data_length(points.len(), 1, "exponential moving average")?;

    let mut out = Vec::with_capacity(points.len());
    let mut ema = points[0].value();
    out.push(TimeSeriesPoint::derived(points[0].timestamp(), ema));

    for p in &points[1..] {
        ema = alpha * p.value() + (1.0 - alpha) * ema;
        out.push(TimeSeriesPoint::derived(p.timestamp(), ema));
    }

    Ok(out)
}

//! Gaussian kernel smoothing.
//!
//! The kernel is sampled from a zero-mean normal density and normalised to
//! unit sum. Samples closer than half a kernel to either end of the series
//! are dropped rather than padded.

use crate::errors::{validate_data_length, validate_finite, ForecastError, ForecastResult};
use crate::series::TimeSeriesPoint;
use statrs::distribution::{Continuous, Normal};

/// Default kernel spread, in samples.
pub const DEFAULT_SIGMA: f64 = 1.0;
/// Default kernel width, in samples.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

fn validate_kernel_parameters(sigma: f64, kernel_size: usize) -> ForecastResult<()> {
    validate_finite(sigma, "sigma")?;
    if sigma <= 0.0 {
        return Err(ForecastError::invalid_parameter("sigma", sigma, "positive"));
    }
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ForecastError::invalid_parameter(
            "kernel_size",
            kernel_size as f64,
            "positive odd integer",
        ));
    }
    Ok(())
}

/// Normalised Gaussian weights at offsets `-half..=half`.
///
/// # Errors
/// `InvalidParameter` if `sigma` is not positive and finite, or if
/// `kernel_size` is zero or even.
pub fn gaussian_kernel(sigma: f64, kernel_size: usize) -> ForecastResult<Vec<f64>> {
    validate_kernel_parameters(sigma, kernel_size)?;

    let density = Normal::new(0.0, sigma)
        .map_err(|_| ForecastError::invalid_parameter("sigma", sigma, "positive"))?;

    let half = (kernel_size / 2) as i64;
    let raw: Vec<f64> = (-half..=half).map(|offset| density.pdf(offset as f64)).collect();
    let total: f64 = raw.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        // Density underflows everywhere but the centre for tiny sigma
        let mut kernel = vec![0.0; kernel_size];
        kernel[kernel_size / 2] = 1.0;
        return Ok(kernel);
    }

    Ok(raw.into_iter().map(|w| w / total).collect())
}

/// Convolve the series with a Gaussian kernel.
///
/// Output length is `n - 2 * (kernel_size / 2)`; each output keeps the
/// timestamp of the sample at the kernel centre.
///
/// # Errors
/// * `InvalidParameter` for an invalid `sigma` or `kernel_size`
/// * `InsufficientData` if the series is shorter than the kernel
pub fn gaussian_smooth(
    points: &[TimeSeriesPoint],
    sigma: f64,
    kernel_size: usize,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_kernel_parameters(sigma, kernel_size)?;
    validate_data_length(points.len(), kernel_size, "gaussian smoothing")?;
    let kernel = gaussian_kernel(sigma, kernel_size)?;

    let half = kernel_size / 2;
    Ok(points
        .windows(kernel_size)
        .map(|w| {
            let value: f64 = w.iter().zip(&kernel).map(|(p, k)| p.value() * k).sum();
            TimeSeriesPoint::derived(w[half].timestamp(), value)
        })
        .collect())
}

//! Error types and validation functions for the forecasting engine.
//!
//! Every fallible operation in this crate reports one of two failure kinds:
//! the input series is too short for the requested computation, or a
//! parameter is structurally invalid. Both are raised before any work is
//! done, so callers never receive partial results.

use thiserror::Error;

/// Error kinds for time-series and investment calculations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ForecastError {
    /// The series is shorter than the operation's minimum length.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// A parameter is outside its valid domain.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },
}

/// Result type for engine operations.
///
/// This is a convenience type alias for operations that may fail with [`ForecastError`].
pub type ForecastResult<T> = Result<T, ForecastError>;

impl ForecastError {
    /// Shorthand for building an [`ForecastError::InvalidParameter`].
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: f64,
        constraint: impl Into<String>,
    ) -> Self {
        ForecastError::InvalidParameter {
            parameter: parameter.into(),
            value,
            constraint: constraint.into(),
        }
    }
}

/// Validates that a series has sufficient length for an operation.
///
/// # Arguments
/// * `len` - Number of samples provided
/// * `min_required` - Minimum number of samples required
/// * `operation` - Name of the operation requiring the data
///
/// # Example
/// ```rust
/// use energy_forecast::errors::validate_data_length;
///
/// assert!(validate_data_length(3, 2, "test").is_ok());
/// assert!(validate_data_length(3, 5, "test").is_err());
/// ```
pub fn validate_data_length(len: usize, min_required: usize, operation: &str) -> ForecastResult<()> {
    if len < min_required {
        log::debug!(
            "{}: {} samples supplied, {} required",
            operation,
            len,
            min_required
        );
        Err(ForecastError::InsufficientData {
            required: min_required,
            actual: len,
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter lies within inclusive bounds.
///
/// NaN is always rejected.
///
/// # Example
/// ```rust
/// use energy_forecast::errors::validate_parameter;
///
/// assert!(validate_parameter(0.5, 0.0, 1.0, "alpha").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "alpha").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> ForecastResult<()> {
    if value.is_nan() {
        return Err(ForecastError::invalid_parameter(name, value, "must not be NaN"));
    }

    if value < min || value > max {
        Err(ForecastError::invalid_parameter(
            name,
            value,
            format!("[{}, {}]", min, max),
        ))
    } else {
        Ok(())
    }
}

/// Validates that a value is finite and not NaN.
///
/// # Example
/// ```rust
/// use energy_forecast::errors::validate_finite;
///
/// assert!(validate_finite(1.0, "test").is_ok());
/// assert!(validate_finite(f64::NAN, "test").is_err());
/// assert!(validate_finite(f64::INFINITY, "test").is_err());
/// ```
pub fn validate_finite(value: f64, name: &str) -> ForecastResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::invalid_parameter(name, value, "finite value"))
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
pub fn validate_all_finite(data: &[f64], name: &str) -> ForecastResult<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ForecastError::invalid_parameter(
            format!("{}[{}]", name, i),
            data[i],
            "finite value",
        )),
        None => Ok(()),
    }
}

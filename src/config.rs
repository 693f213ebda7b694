//! # Analysis Configuration
//!
//! Every tunable default used by [`SeriesAnalyzer`](crate::analyzer::SeriesAnalyzer)
//! lives here, together with presets for the two common metering cadences.

use crate::anomaly::DEFAULT_ANOMALY_THRESHOLD;
use crate::change_points::{DEFAULT_CHANGE_POINT_THRESHOLD, DEFAULT_CHANGE_POINT_WINDOW};
use crate::cycles::{DEFAULT_MAX_PERIOD, DEFAULT_MIN_STRENGTH};
use crate::errors::{validate_finite, validate_parameter, ForecastError, ForecastResult};
use crate::forecast::DEFAULT_FORECAST_PERIODS;
use crate::roi::DEFAULT_DISCOUNT_RATE;
use crate::seasonality::DEFAULT_SEASONALITY_THRESHOLD;
use crate::smoothing::{DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for a full series analysis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Longest period searched by the cycle finder
    pub max_period: usize,
    /// Minimum |autocorrelation| reported as a cycle
    pub min_cycle_strength: f64,
    /// Expected seasonal period, in samples
    pub seasonal_period: usize,
    /// Strength above which a series counts as seasonal
    pub seasonality_threshold: f64,
    /// Absolute z-score above which a reading is anomalous
    pub anomaly_threshold: f64,
    /// Samples on each side of a change-point candidate
    pub change_point_window: usize,
    /// Change-point sensitivity multiplier
    pub change_point_threshold: f64,
    /// Gaussian smoothing spread, in samples
    pub smoothing_sigma: f64,
    /// Gaussian smoothing kernel width, in samples
    pub smoothing_kernel_size: usize,
    /// Number of intervals to forecast
    pub forecast_periods: usize,
    /// Annual discount rate for ROI figures
    pub discount_rate: f64,
    /// Run the trend change-point scan
    pub enable_change_points: bool,
    /// Produce a smoothed copy of the series
    pub enable_smoothing: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::monthly_billing()
    }
}

impl AnalysisConfig {
    /// Monthly billing data: yearly seasonality, one-year forecast
    pub fn monthly_billing() -> Self {
        Self {
            max_period: DEFAULT_MAX_PERIOD,
            min_cycle_strength: DEFAULT_MIN_STRENGTH,
            seasonal_period: 12,
            seasonality_threshold: DEFAULT_SEASONALITY_THRESHOLD,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            change_point_window: DEFAULT_CHANGE_POINT_WINDOW,
            change_point_threshold: DEFAULT_CHANGE_POINT_THRESHOLD,
            smoothing_sigma: DEFAULT_SIGMA,
            smoothing_kernel_size: DEFAULT_KERNEL_SIZE,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            enable_change_points: true,
            enable_smoothing: true,
        }
    }

    /// Daily meter reads: weekly seasonality, one-month forecast
    pub fn daily_metering() -> Self {
        Self {
            seasonal_period: 7,
            change_point_window: 7,
            forecast_periods: 30,
            ..Self::monthly_billing()
        }
    }

    /// Summary statistics, seasonality, cycles, anomalies and forecasts only
    pub fn summary_only() -> Self {
        Self {
            enable_change_points: false,
            enable_smoothing: false,
            ..Self::monthly_billing()
        }
    }

    /// Check if change-point detection is enabled
    pub fn is_change_point_detection_enabled(&self) -> bool {
        self.enable_change_points
    }

    /// Check if smoothing is enabled
    pub fn is_smoothing_enabled(&self) -> bool {
        self.enable_smoothing
    }

    /// Reject settings that every analysis would fail on.
    ///
    /// # Errors
    /// `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> ForecastResult<()> {
        if self.max_period < 2 {
            return Err(ForecastError::invalid_parameter(
                "max_period",
                self.max_period as f64,
                "at least 2",
            ));
        }
        validate_parameter(self.min_cycle_strength, 0.0, 1.0, "min_cycle_strength")?;
        if self.seasonal_period == 0 {
            return Err(ForecastError::invalid_parameter(
                "seasonal_period",
                0.0,
                "at least 1",
            ));
        }
        validate_finite(self.seasonality_threshold, "seasonality_threshold")?;
        validate_finite(self.anomaly_threshold, "anomaly_threshold")?;
        if self.anomaly_threshold < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "anomaly_threshold",
                self.anomaly_threshold,
                "non-negative",
            ));
        }
        if self.change_point_window < 2 {
            return Err(ForecastError::invalid_parameter(
                "change_point_window",
                self.change_point_window as f64,
                "at least 2",
            ));
        }
        validate_finite(self.change_point_threshold, "change_point_threshold")?;
        if self.change_point_threshold < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "change_point_threshold",
                self.change_point_threshold,
                "non-negative",
            ));
        }
        validate_finite(self.smoothing_sigma, "smoothing_sigma")?;
        if self.smoothing_sigma <= 0.0 {
            return Err(ForecastError::invalid_parameter(
                "smoothing_sigma",
                self.smoothing_sigma,
                "positive",
            ));
        }
        if self.smoothing_kernel_size == 0 || self.smoothing_kernel_size % 2 == 0 {
            return Err(ForecastError::invalid_parameter(
                "smoothing_kernel_size",
                self.smoothing_kernel_size as f64,
                "positive odd integer",
            ));
        }
        validate_finite(self.discount_rate, "discount_rate")?;
        if self.discount_rate <= -1.0 {
            return Err(ForecastError::invalid_parameter(
                "discount_rate",
                self.discount_rate,
                "greater than -1",
            ));
        }
        Ok(())
    }
}

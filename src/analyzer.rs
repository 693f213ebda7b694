//! # Series Analyzer
//!
//! [`SeriesAnalyzer`] runs every engine component over one series with a
//! single [`AnalysisConfig`] and bundles the outputs into a [`SeriesReport`].
//! It holds no state between calls, so one analyzer can serve many series
//! (and many threads).
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use energy_forecast::{AnalysisConfig, SeriesAnalyzer};
//! use energy_forecast::generators::{generate_consumption_series, SyntheticSeriesConfig};
//!
//! # fn main() -> Result<(), energy_forecast::ForecastError> {
//! let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let bills = generate_consumption_series(
//!     &SyntheticSeriesConfig::default(),
//!     start,
//!     Duration::days(30),
//! )?;
//!
//! let analyzer = SeriesAnalyzer::new(AnalysisConfig::monthly_billing())?;
//! let report = analyzer.analyze(&bills)?;
//! assert_eq!(report.summary.count, 48);
//! assert_eq!(report.forecasts.linear_trend.len(), 12);
//! # Ok(())
//! # }
//! ```

use crate::{
    anomaly::detect_anomalies,
    change_points::detect_trend_changes,
    config::AnalysisConfig,
    cycles::find_cyclical_patterns,
    errors::{validate_data_length, ForecastError, ForecastResult},
    forecast::{linear_trend_forecast, persistence_forecast},
    math_utils::{linear_fit, mean_and_std_dev},
    results::{ForecastBundle, SeasonalityAssessment, SeriesReport, SummaryStatistics},
    roi::{calculate_roi, RoiResult},
    seasonality::{is_seasonal, seasonality_strength},
    series::{values, TimeSeriesPoint},
    smoothing::gaussian_smooth,
};
use chrono::Duration;

/// Fewest samples a full analysis accepts.
pub const MIN_ANALYSIS_SAMPLES: usize = 4;

/// Turn a too-short-series failure into an absent section.
fn optional_section<T>(result: ForecastResult<T>, section: &str) -> ForecastResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ForecastError::InsufficientData { required, actual }) => {
            log::debug!(
                "Skipping {}: need {} points, have {}",
                section,
                required,
                actual
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Mean spacing between consecutive samples.
fn sample_spacing(points: &[TimeSeriesPoint]) -> ForecastResult<Duration> {
    let first = points[0].timestamp();
    let last = points[points.len() - 1].timestamp();
    let span_ms = (last - first).num_milliseconds();
    let spacing_ms = span_ms / (points.len() as i64 - 1);
    if spacing_ms <= 0 {
        return Err(ForecastError::invalid_parameter(
            "sample_spacing_ms",
            spacing_ms as f64,
            "positive (timestamps must advance)",
        ));
    }
    Ok(Duration::milliseconds(spacing_ms))
}

/// Stateless analysis pipeline over a validated configuration
#[derive(Debug, Clone, Default)]
pub struct SeriesAnalyzer {
    config: AnalysisConfig,
}

impl SeriesAnalyzer {
    /// Create an analyzer, rejecting an unusable configuration up front.
    pub fn new(config: AnalysisConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every analysis section over `points`.
    ///
    /// Forecasts are spaced by the mean sample interval of the input.
    ///
    /// # Errors
    /// * `InsufficientData` for fewer than [`MIN_ANALYSIS_SAMPLES`] points
    /// * `InvalidParameter` if the timestamps do not advance
    pub fn analyze(&self, points: &[TimeSeriesPoint]) -> ForecastResult<SeriesReport> {
        validate_data_length(points.len(), MIN_ANALYSIS_SAMPLES, "series analysis")?;
        let config = &self.config;

        let data = values(points);
        let (mean, std_dev) = mean_and_std_dev(&data)?;
        let fit = linear_fit(points)?;
        let summary = SummaryStatistics {
            count: points.len(),
            mean,
            std_dev,
            slope_per_day: fit.slope,
            start: points[0].timestamp(),
            end: points[points.len() - 1].timestamp(),
        };

        let seasonality = optional_section(
            seasonality_strength(points, config.seasonal_period),
            "seasonality",
        )?
        .map(|strength| SeasonalityAssessment {
            period: config.seasonal_period,
            strength,
            is_seasonal: is_seasonal(strength, config.seasonality_threshold),
        });

        let cyclical_patterns =
            find_cyclical_patterns(points, config.max_period, config.min_cycle_strength)?;
        let anomalies = detect_anomalies(points, config.anomaly_threshold)?;

        let change_points = if config.is_change_point_detection_enabled() {
            optional_section(
                detect_trend_changes(
                    points,
                    config.change_point_window,
                    config.change_point_threshold,
                ),
                "change points",
            )?
        } else {
            None
        };

        let smoothed = if config.is_smoothing_enabled() {
            optional_section(
                gaussian_smooth(points, config.smoothing_sigma, config.smoothing_kernel_size),
                "smoothing",
            )?
        } else {
            None
        };

        let interval = sample_spacing(points)?;
        let forecasts = ForecastBundle {
            persistence: persistence_forecast(points, config.forecast_periods, interval)?,
            linear_trend: linear_trend_forecast(points, config.forecast_periods, interval)?,
        };

        Ok(SeriesReport {
            summary,
            seasonality,
            cyclical_patterns,
            anomalies,
            change_points,
            smoothed,
            forecasts,
        })
    }

    /// Price an efficiency measure at the configured discount rate.
    ///
    /// # Errors
    /// Same as [`calculate_roi`].
    pub fn evaluate_investment(
        &self,
        implementation_cost: f64,
        annual_savings: f64,
        years_of_operation: u32,
    ) -> ForecastResult<RoiResult> {
        calculate_roi(
            implementation_cost,
            annual_savings,
            years_of_operation,
            self.config.discount_rate,
        )
    }
}

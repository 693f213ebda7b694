//! # Energy Forecast
//!
//! Time-series analytics and investment-return calculations for building
//! energy consumption data.
//!
//! The crate is a pure computation engine. A host application loads a
//! chronologically ordered sequence of timestamped readings (meter reads,
//! utility bills, temperatures), calls the functions here and hands the
//! results to its own reporting layer. Nothing is persisted and no I/O is
//! performed.
//!
//! ## Key Features
//!
//! - **Moving Averages**: simple, weighted and exponential smoothing
//! - **Seasonality**: autocorrelation strength, phase components and adjustment
//! - **Cycles and Trends**: periodic pattern search and trend change points
//! - **Anomalies**: z-score flagging of unusual readings
//! - **Forecasts**: persistence and linear-trend baselines
//! - **Investment Returns**: payback, ROI, NPV, IRR and a cash-flow schedule
//! - **Weather Normalisation**: degree days, monthly adjustment factors,
//!   normalised consumption and HVAC impact estimates
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use energy_forecast::{calculate_roi, series_from_values, SeriesAnalyzer};
//!
//! fn main() -> Result<(), energy_forecast::ForecastError> {
//!     let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
//!     let kwh: Vec<f64> = (0..36)
//!         .map(|m| 800.0 + 200.0 * (m as f64 * std::f64::consts::PI / 6.0).cos())
//!         .collect();
//!     let bills = series_from_values(start, Duration::days(30), &kwh)?;
//!
//!     let report = SeriesAnalyzer::default().analyze(&bills)?;
//!     println!("seasonal: {}", report.is_seasonal());
//!
//!     let retrofit = calculate_roi(12_000.0, 2_400.0, 15, 0.05)?;
//!     println!("payback {:.1} years, NPV {:.0}", retrofit.simple_payback_period, retrofit.npv);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Diagnostic messages go through the [`log`] facade. No logger is
//! installed by the crate.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod math_utils;
pub mod results;
pub mod series;

// Analysis methods
pub mod analyzer;
pub mod anomaly;
pub mod change_points;
pub mod cycles;
pub mod forecast;
pub mod moving_average;
pub mod seasonality;
pub mod smoothing;

// Energy and finance
pub mod degree_days;
pub mod generators;
pub mod roi;

// Re-exports for convenience - main public API
pub use analyzer::{SeriesAnalyzer, MIN_ANALYSIS_SAMPLES};
pub use config::AnalysisConfig;
pub use errors::{ForecastError, ForecastResult};
pub use results::{ForecastBundle, SeasonalityAssessment, SeriesReport, SummaryStatistics};
pub use series::{series_from_values, TimeSeriesPoint};

pub use anomaly::detect_anomalies;
pub use degree_days::{seasonal_adjustment_factors, weather_normalized_consumption};
pub use change_points::detect_trend_changes;
pub use cycles::{find_cyclical_patterns, CyclicalPattern};
pub use forecast::{linear_trend_forecast, persistence_forecast};
pub use moving_average::{
    exponential_moving_average, simple_moving_average, weighted_moving_average,
};
pub use roi::{calculate_roi, CashFlowYear, RoiResult};
pub use seasonality::{seasonal_adjustment, seasonality_strength};
pub use smoothing::gaussian_smooth;

//! # Analysis Results Structures
//!
//! Output of [`SeriesAnalyzer::analyze`](crate::analyzer::SeriesAnalyzer::analyze),
//! shaped for the report layer.

use crate::cycles::CyclicalPattern;
use crate::series::TimeSeriesPoint;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Descriptive statistics of the analysed series
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Least-squares trend, in value units per day
    pub slope_per_day: f64,
    /// Timestamp of the first sample
    pub start: DateTime<Utc>,
    /// Timestamp of the last sample
    pub end: DateTime<Utc>,
}

/// Seasonality at the configured period
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeasonalityAssessment {
    /// Period tested, in samples
    pub period: usize,
    /// Lag-`period` autocorrelation
    pub strength: f64,
    /// Whether `strength` exceeds the configured threshold
    pub is_seasonal: bool,
}

/// Both baseline forecasts over the configured horizon
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastBundle {
    /// Last observed value repeated
    pub persistence: Vec<TimeSeriesPoint>,
    /// Least-squares trend extended
    pub linear_trend: Vec<TimeSeriesPoint>,
}

/// Complete results from a series analysis
///
/// Optional sections are `None` when the series is too short for them or
/// when they are disabled in the configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesReport {
    /// Descriptive statistics
    pub summary: SummaryStatistics,
    /// Seasonality at the configured period
    pub seasonality: Option<SeasonalityAssessment>,
    /// Significant periods, strongest first
    pub cyclical_patterns: Vec<CyclicalPattern>,
    /// Readings beyond the anomaly threshold, chronological
    pub anomalies: Vec<TimeSeriesPoint>,
    /// Trend reversals, chronological
    pub change_points: Option<Vec<TimeSeriesPoint>>,
    /// Gaussian-smoothed series
    pub smoothed: Option<Vec<TimeSeriesPoint>>,
    /// Baseline forecasts
    pub forecasts: ForecastBundle,
}

impl SeriesReport {
    /// Strongest detected cycle, if any.
    pub fn dominant_cycle(&self) -> Option<&CyclicalPattern> {
        self.cyclical_patterns.first()
    }

    /// Whether the series shows material seasonality at the configured period.
    pub fn is_seasonal(&self) -> bool {
        self.seasonality.is_some_and(|s| s.is_seasonal)
    }
}

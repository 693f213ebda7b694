//! Integration tests for error handling and invalid input scenarios
//!
//! Every minimum-length violation must surface as `InsufficientData` with
//! the exact requirement, and every structurally invalid parameter as
//! `InvalidParameter`. Degenerate but valid inputs return values.

use chrono::{Duration, TimeZone, Utc};
use energy_forecast::{
    change_points::detect_trend_changes,
    cycles::find_cyclical_patterns,
    degree_days::monthly_degree_days,
    errors::ForecastError,
    forecast::{linear_trend_forecast, persistence_forecast},
    math_utils::{autocorrelation, linear_fit},
    seasonality::{seasonal_adjustment, seasonal_components, seasonality_strength},
    series::series_from_values,
    smoothing::gaussian_smooth,
    *,
};

fn daily(n: usize) -> Vec<TimeSeriesPoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let raw: Vec<f64> = (0..n).map(|i| 10.0 + (i % 3) as f64).collect();
    series_from_values(start, Duration::days(1), &raw).unwrap()
}

fn assert_insufficient<T: std::fmt::Debug>(
    result: Result<T, ForecastError>,
    required: usize,
    actual: usize,
) {
    match result {
        Err(ForecastError::InsufficientData {
            required: r,
            actual: a,
        }) => {
            assert_eq!((r, a), (required, actual));
        }
        other => panic!(
            "Expected InsufficientData {{ {}, {} }}, got {:?}",
            required, actual, other
        ),
    }
}

fn assert_invalid<T: std::fmt::Debug>(result: Result<T, ForecastError>) {
    assert!(
        matches!(result, Err(ForecastError::InvalidParameter { .. })),
        "Expected InvalidParameter, got {:?}",
        result
    );
}

/// Test scenario: each operation one sample short of its minimum
#[test]
fn test_minimum_length_violations() {
    assert_insufficient(simple_moving_average(&daily(2), 3), 3, 2);
    assert_insufficient(weighted_moving_average(&daily(1), &[0.5, 0.5]), 2, 1);
    assert_insufficient(exponential_moving_average(&daily(0), 0.5), 1, 0);

    assert_insufficient(seasonality_strength(&daily(23), 12), 24, 23);
    assert_insufficient(seasonal_components(&daily(13), 7), 14, 13);
    assert_insufficient(seasonal_adjustment(&daily(5), 3), 6, 5);

    assert_insufficient(find_cyclical_patterns(&daily(3), 20, 0.1), 4, 3);
    assert_insufficient(detect_trend_changes(&daily(6), 3, 1.0), 7, 6);
    assert_insufficient(detect_anomalies(&daily(0), 3.0), 1, 0);
    assert_insufficient(gaussian_smooth(&daily(4), 1.0, 5), 5, 4);

    assert_insufficient(persistence_forecast(&daily(0), 3, Duration::days(1)), 1, 0);
    assert_insufficient(linear_trend_forecast(&daily(1), 3, Duration::days(1)), 2, 1);
    assert_insufficient(linear_fit(&daily(1)), 2, 1);
    assert_insufficient(autocorrelation(&[1.0, 2.0, 3.0], 2), 4, 3);

    assert_insufficient(monthly_degree_days(&daily(0), 65.0), 1, 0);
    assert_insufficient(SeriesAnalyzer::default().analyze(&daily(3)), 4, 3);
}

/// Test scenario: exactly the minimum length succeeds
#[test]
fn test_minimum_length_accepted() {
    assert!(simple_moving_average(&daily(3), 3).is_ok());
    assert!(seasonality_strength(&daily(24), 12).is_ok());
    assert!(find_cyclical_patterns(&daily(4), 20, 0.1).is_ok());
    assert!(detect_trend_changes(&daily(7), 3, 1.0).is_ok());
    assert!(gaussian_smooth(&daily(5), 1.0, 5).is_ok());
    assert!(SeriesAnalyzer::default().analyze(&daily(4)).is_ok());
}

/// Test scenario: structurally invalid parameters
#[test]
fn test_invalid_parameters() {
    let points = daily(30);

    assert_invalid(simple_moving_average(&points, 0));
    assert_invalid(weighted_moving_average(&points, &[]));
    assert_invalid(weighted_moving_average(&points, &[0.3, 0.3]));
    assert_invalid(exponential_moving_average(&points, 0.0));
    assert_invalid(exponential_moving_average(&points, 1.5));

    assert_invalid(seasonality_strength(&points, 0));
    assert_invalid(find_cyclical_patterns(&points, 1, 0.1));
    assert_invalid(detect_trend_changes(&points, 1, 1.0));
    assert_invalid(detect_anomalies(&points, -0.5));
    assert_invalid(gaussian_smooth(&points, 0.0, 5));
    assert_invalid(gaussian_smooth(&points, 1.0, 6));

    assert_invalid(persistence_forecast(&points, 5, Duration::zero()));
    assert_invalid(linear_trend_forecast(&points, 5, Duration::hours(-1)));

    assert_invalid(calculate_roi(0.0, 100.0, 10, 0.05));
    assert_invalid(calculate_roi(1_000.0, f64::NAN, 10, 0.05));
    assert_invalid(calculate_roi(1_000.0, 100.0, 0, 0.05));
    assert_invalid(calculate_roi(1_000.0, 100.0, 10, -1.0));

    assert_invalid(TimeSeriesPoint::new(Utc::now(), f64::NAN));
    assert_invalid(series_from_values(Utc::now(), Duration::days(1), &[1.0, f64::INFINITY]));
    assert_invalid(monthly_degree_days(&points, f64::NAN));
}

/// Test scenario: invalid parameters are reported before length problems
#[test]
fn test_parameter_checked_before_length() {
    let short = daily(2);
    assert_invalid(simple_moving_average(&short, 0));
    assert_invalid(detect_trend_changes(&short, 1, 1.0));
    assert_invalid(gaussian_smooth(&short, -1.0, 5));
}

/// Test scenario: degenerate but valid inputs return values, not errors
#[test]
fn test_degenerate_inputs_are_not_errors() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let flat = series_from_values(start, Duration::days(1), &[42.0; 30]).unwrap();

    assert!(detect_anomalies(&flat, 3.0).unwrap().is_empty());
    assert_eq!(seasonality_strength(&flat, 7).unwrap(), 0.0);
    assert!(find_cyclical_patterns(&flat, 20, 0.1).unwrap().is_empty());
    assert!(detect_trend_changes(&flat, 3, 1.0).unwrap().is_empty());
    assert_eq!(linear_fit(&flat).unwrap().slope, 0.0);
    assert!(persistence_forecast(&flat, 0, Duration::days(1)).unwrap().is_empty());

    let roi = calculate_roi(5_000.0, 0.0, 10, 0.05).unwrap();
    assert!(roi.simple_payback_period.is_infinite());
    assert!(roi.irr.is_none());
}

//! Heating and cooling degree days.
//!
//! A degree day measures how far a mean temperature falls below (heating)
//! or rises above (cooling) a base temperature. Temperatures are in the same
//! unit as the base; the default base is 65 °F.
//!
//! Monthly totals feed weather normalisation: each calendar month gets an
//! adjustment factor from its share of the year's degree days, and
//! consumption is divided by that factor to remove the weather signal.

use crate::errors::{validate_data_length, validate_finite, ForecastError, ForecastResult};
use crate::math_utils::kahan_sum;
use crate::series::TimeSeriesPoint;
use chrono::Datelike;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Conventional base temperature in °F.
pub const DEFAULT_BASE_TEMPERATURE: f64 = 65.0;
/// Smallest monthly weather adjustment factor.
pub const MIN_ADJUSTMENT_FACTOR: f64 = 0.6;
/// Largest monthly weather adjustment factor.
pub const MAX_ADJUSTMENT_FACTOR: f64 = 1.8;

/// Heating demand per square foot per heating degree day, in BTU.
pub const HEATING_BTU_PER_SQFT_DEGREE_DAY: f64 = 1.5;
/// Cooling demand per square foot per cooling degree day, in BTU.
pub const COOLING_BTU_PER_SQFT_DEGREE_DAY: f64 = 2.0;
/// BTU in one kWh.
pub const BTU_PER_KWH: f64 = 3412.0;
/// Efficiency gain assumed for an HVAC upgrade.
pub const UPGRADE_EFFICIENCY_GAIN: f64 = 0.2;
/// Best efficiency an upgraded system is assumed to reach.
pub const MAX_UPGRADED_EFFICIENCY: f64 = 0.95;
/// Upgrade cost per square foot used for the rough upgrade return.
pub const UPGRADE_COST_PER_SQFT: f64 = 1.5;

/// Degree-day totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonthlyDegreeDays {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Sum of heating degree days.
    pub heating: f64,
    /// Sum of cooling degree days.
    pub cooling: f64,
    /// Number of temperature samples in the month.
    pub samples: usize,
    /// Mean temperature over the month's samples.
    pub mean_temperature: f64,
}

fn map_degrees(
    temps: &[TimeSeriesPoint],
    base: f64,
    f: impl Fn(f64) -> f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    validate_finite(base, "base_temperature")?;
    Ok(temps
        .iter()
        .map(|p| TimeSeriesPoint::derived(p.timestamp(), f(p.value())))
        .collect())
}

/// Per-sample `max(base - t, 0)`, keeping timestamps.
///
/// # Errors
/// `InvalidParameter` if `base` is not finite.
pub fn heating_degree_days(
    temps: &[TimeSeriesPoint],
    base: f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    map_degrees(temps, base, |t| (base - t).max(0.0))
}

/// Per-sample `max(t - base, 0)`, keeping timestamps.
///
/// # Errors
/// `InvalidParameter` if `base` is not finite.
pub fn cooling_degree_days(
    temps: &[TimeSeriesPoint],
    base: f64,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    map_degrees(temps, base, |t| (t - base).max(0.0))
}

/// Heating and cooling totals per calendar month, oldest first.
///
/// Samples are grouped by the UTC calendar month of their timestamp and do
/// not need to be sorted.
///
/// # Errors
/// * `InvalidParameter` if `base` is not finite
/// * `InsufficientData` for an empty series
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::degree_days::monthly_degree_days;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 30, 0, 0, 0).unwrap();
/// let temps = series_from_values(start, Duration::days(1), &[40.0, 50.0, 70.0]).unwrap();
/// let months = monthly_degree_days(&temps, 65.0).unwrap();
///
/// assert_eq!((months[0].month, months[0].heating), (1, 40.0));
/// assert_eq!((months[1].month, months[1].cooling), (2, 5.0));
/// ```
pub fn monthly_degree_days(
    temps: &[TimeSeriesPoint],
    base: f64,
) -> ForecastResult<Vec<MonthlyDegreeDays>> {
    validate_finite(base, "base_temperature")?;
    validate_data_length(temps.len(), 1, "monthly degree days")?;

    let mut months: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for p in temps {
        let ts = p.timestamp();
        months.entry((ts.year(), ts.month())).or_default().push(p.value());
    }

    Ok(months
        .into_iter()
        .map(|((year, month), readings)| {
            let hdd: Vec<f64> = readings.iter().map(|t| (base - t).max(0.0)).collect();
            let cdd: Vec<f64> = readings.iter().map(|t| (t - base).max(0.0)).collect();
            MonthlyDegreeDays {
                year,
                month,
                heating: kahan_sum(&hdd),
                cooling: kahan_sum(&cdd),
                samples: readings.len(),
                mean_temperature: kahan_sum(&readings) / readings.len() as f64,
            }
        })
        .collect())
}

/// Typical (heating, cooling) monthly degree days for a month with no
/// observations, northern-hemisphere seasons.
fn typical_month(month: u32) -> (f64, f64) {
    match month {
        12 | 1 | 2 => (20.0, 0.0),
        6..=8 => (0.0, 20.0),
        _ => (10.0, 5.0),
    }
}

/// Weather adjustment factor for each calendar month, January first.
///
/// Heating and cooling totals are averaged per calendar month across years.
/// Each factor is the month's combined degree days over the mean of the
/// twelve months, clamped to
/// [`MIN_ADJUSTMENT_FACTOR`]..=[`MAX_ADJUSTMENT_FACTOR`]. Months without
/// observations take typical northern-hemisphere values. Every factor is
/// 1.0 when the mean is zero.
///
/// # Errors
/// * `InvalidParameter` for a month outside 1 to 12 or a non-finite total
/// * `InsufficientData` if `months` is empty
pub fn seasonal_adjustment_factors(months: &[MonthlyDegreeDays]) -> ForecastResult<[f64; 12]> {
    for m in months {
        if !(1..=12).contains(&m.month) {
            return Err(ForecastError::invalid_parameter(
                "month",
                f64::from(m.month),
                "between 1 and 12",
            ));
        }
        validate_finite(m.heating, "heating")?;
        validate_finite(m.cooling, "cooling")?;
    }
    validate_data_length(months.len(), 1, "seasonal adjustment factors")?;

    let mut observed: [Vec<f64>; 12] = Default::default();
    for m in months {
        observed[m.month as usize - 1].push(m.heating + m.cooling);
    }

    let mut combined = [0.0; 12];
    for (month, totals) in observed.iter().enumerate() {
        combined[month] = if totals.is_empty() {
            let (heating, cooling) = typical_month(month as u32 + 1);
            log::debug!("No degree days for month {}, using typical values", month + 1);
            heating + cooling
        } else {
            kahan_sum(totals) / totals.len() as f64
        };
    }

    let average = kahan_sum(&combined) / 12.0;
    let mut factors = [1.0; 12];
    if average > 0.0 {
        for (factor, total) in factors.iter_mut().zip(&combined) {
            *factor = (total / average).clamp(MIN_ADJUSTMENT_FACTOR, MAX_ADJUSTMENT_FACTOR);
        }
    }
    Ok(factors)
}

/// Divide each reading by the adjustment factor of its calendar month.
///
/// # Errors
/// `InvalidParameter` if a factor is not positive and finite.
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use energy_forecast::degree_days::weather_normalized_consumption;
/// use energy_forecast::series::series_from_values;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap();
/// let kwh = series_from_values(start, Duration::days(1), &[300.0, 300.0]).unwrap();
/// let mut factors = [1.0; 12];
/// factors[0] = 1.5;
///
/// let normalized = weather_normalized_consumption(&kwh, &factors).unwrap();
/// assert_eq!(normalized[0].value(), 200.0);
/// assert_eq!(normalized[1].value(), 300.0);
/// ```
pub fn weather_normalized_consumption(
    points: &[TimeSeriesPoint],
    factors: &[f64; 12],
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    for &factor in factors {
        validate_finite(factor, "adjustment_factor")?;
        if factor <= 0.0 {
            return Err(ForecastError::invalid_parameter(
                "adjustment_factor",
                factor,
                "positive",
            ));
        }
    }

    Ok(points
        .iter()
        .map(|p| {
            let factor = factors[p.timestamp().month0() as usize];
            TimeSeriesPoint::derived(p.timestamp(), p.value() / factor)
        })
        .collect())
}

/// Building and tariff inputs for [`hvac_weather_impact`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HvacProfile {
    /// Seasonal efficiency of the current system, in (0, 1].
    pub system_efficiency: f64,
    /// Conditioned floor area, in square feet.
    pub square_footage: f64,
    /// Electricity price per kWh.
    pub electricity_rate: f64,
}

impl Default for HvacProfile {
    fn default() -> Self {
        Self {
            system_efficiency: 0.8,
            square_footage: 2_000.0,
            electricity_rate: 0.14,
        }
    }
}

/// Rule-of-thumb HVAC energy use and upgrade savings for a degree-day total.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HvacImpactEstimate {
    /// Heating energy, kWh.
    pub heating_kwh: f64,
    /// Cooling energy, kWh.
    pub cooling_kwh: f64,
    /// Heating plus cooling energy, kWh.
    pub total_kwh: f64,
    /// Cost of `total_kwh` at the profile's rate.
    pub estimated_cost: f64,
    /// Cost saved by upgrading the system's efficiency.
    pub potential_savings: f64,
    /// Savings as a fraction of the assumed upgrade cost.
    pub upgrade_return: f64,
}

/// Estimate HVAC energy from heating and cooling degree-day totals.
///
/// An upgrade adds [`UPGRADE_EFFICIENCY_GAIN`] to the system efficiency,
/// capped at [`MAX_UPGRADED_EFFICIENCY`].
///
/// # Errors
/// `InvalidParameter` for negative or non-finite totals, an efficiency
/// outside (0, 1], a non-positive floor area or a negative rate.
pub fn hvac_weather_impact(
    total_heating: f64,
    total_cooling: f64,
    profile: &HvacProfile,
) -> ForecastResult<HvacImpactEstimate> {
    for (name, value) in [
        ("total_heating", total_heating),
        ("total_cooling", total_cooling),
        ("electricity_rate", profile.electricity_rate),
    ] {
        validate_finite(value, name)?;
        if value < 0.0 {
            return Err(ForecastError::invalid_parameter(name, value, "non-negative"));
        }
    }
    validate_finite(profile.system_efficiency, "system_efficiency")?;
    if profile.system_efficiency <= 0.0 || profile.system_efficiency > 1.0 {
        return Err(ForecastError::invalid_parameter(
            "system_efficiency",
            profile.system_efficiency,
            "in (0, 1]",
        ));
    }
    validate_finite(profile.square_footage, "square_footage")?;
    if profile.square_footage <= 0.0 {
        return Err(ForecastError::invalid_parameter(
            "square_footage",
            profile.square_footage,
            "positive",
        ));
    }

    let heating_load =
        total_heating * profile.square_footage * HEATING_BTU_PER_SQFT_DEGREE_DAY / BTU_PER_KWH;
    let cooling_load =
        total_cooling * profile.square_footage * COOLING_BTU_PER_SQFT_DEGREE_DAY / BTU_PER_KWH;

    let heating_kwh = heating_load / profile.system_efficiency;
    let cooling_kwh = cooling_load / profile.system_efficiency;
    let total_kwh = heating_kwh + cooling_kwh;

    let upgraded = (profile.system_efficiency + UPGRADE_EFFICIENCY_GAIN).min(MAX_UPGRADED_EFFICIENCY);
    let upgraded_kwh = (heating_load + cooling_load) / upgraded;
    // An already efficient system gains nothing
    let potential_savings = (total_kwh - upgraded_kwh).max(0.0) * profile.electricity_rate;

    Ok(HvacImpactEstimate {
        heating_kwh,
        cooling_kwh,
        total_kwh,
        estimated_cost: total_kwh * profile.electricity_rate,
        potential_savings,
        upgrade_return: potential_savings / (profile.square_footage * UPGRADE_COST_PER_SQFT),
    })
}

//! Investment return metrics for efficiency measures.
//!
//! A measure costs `implementation_cost` up front and returns a constant
//! `annual_savings` at the end of each year of operation. The metrics are
//! computed in `f64`; the year-by-year schedule handed to reports uses exact
//! decimal amounts rounded to cents.

use crate::errors::{validate_finite, ForecastError, ForecastResult};
use rust_decimal::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default annual discount rate.
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.05;
/// Lower end of the IRR search interval.
pub const IRR_LOWER_BOUND: f64 = -0.99;
/// Upper end of the IRR search interval.
pub const IRR_UPPER_BOUND: f64 = 10.0;
/// Iteration cap for the IRR bisection.
pub const IRR_MAX_ITERATIONS: usize = 200;
/// Interval width at which the IRR bisection stops.
pub const IRR_TOLERANCE: f64 = 1e-10;
/// Longest operating period accepted, in years.
pub const MAX_YEARS_OF_OPERATION: u32 = 100;

/// Summary investment metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoiResult {
    /// Years until undiscounted savings repay the cost; `+∞` if never.
    pub simple_payback_period: f64,
    /// Undiscounted return over the whole operating period, as a fraction of cost.
    pub roi: f64,
    /// Net present value at the requested discount rate.
    pub npv: f64,
    /// Internal rate of return, when a root exists in the search interval.
    pub irr: Option<f64>,
}

/// One row of the discounted cash-flow schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CashFlowYear {
    /// Year index; year 0 carries the implementation cost.
    pub year: u32,
    /// Undiscounted cash flow.
    pub nominal: Decimal,
    /// Cash flow discounted to year 0.
    pub discounted: Decimal,
    /// Running total of discounted cash flows.
    pub cumulative_discounted: Decimal,
}

fn validate_inputs(cost: f64, savings: f64, years: u32, rate: f64) -> ForecastResult<()> {
    validate_finite(cost, "implementation_cost")?;
    if cost <= 0.0 {
        return Err(ForecastError::invalid_parameter(
            "implementation_cost",
            cost,
            "positive",
        ));
    }
    validate_finite(savings, "annual_savings")?;
    if years == 0 || years > MAX_YEARS_OF_OPERATION {
        return Err(ForecastError::invalid_parameter(
            "years_of_operation",
            f64::from(years),
            format!("between 1 and {} years", MAX_YEARS_OF_OPERATION),
        ));
    }
    validate_finite(rate, "discount_rate")?;
    if rate <= -1.0 {
        return Err(ForecastError::invalid_parameter(
            "discount_rate",
            rate,
            "greater than -1",
        ));
    }
    Ok(())
}

fn discount_factor(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(year as i32).recip()
}

/// Present value of 1 per year for `years` years: `(1 - (1 + r)^-n) / r`.
fn annuity_factor(rate: f64, years: u32) -> f64 {
    let n = f64::from(years);
    if rate == 0.0 {
        return n;
    }
    // expm1/ln_1p keep precision for rates near zero
    -(-n * rate.ln_1p()).exp_m1() / rate
}

fn npv_unchecked(cost: f64, savings: f64, years: u32, rate: f64) -> f64 {
    savings * annuity_factor(rate, years) - cost
}

/// Net present value of `years` equal savings against an up-front cost.
///
/// # Errors
/// `InvalidParameter` if `cost` is not positive, `years` is zero or above
/// [`MAX_YEARS_OF_OPERATION`], or a value is non-finite or `rate <= -1`.
pub fn net_present_value(cost: f64, savings: f64, years: u32, rate: f64) -> ForecastResult<f64> {
    validate_inputs(cost, savings, years, rate)?;
    Ok(npv_unchecked(cost, savings, years, rate))
}

/// Rate at which the net present value is zero, by bisection over
/// `[IRR_LOWER_BOUND, IRR_UPPER_BOUND]`.
///
/// Returns `None` when savings are not positive or the root lies outside
/// the search interval.
///
/// # Errors
/// `InvalidParameter` if `cost` is not positive, `years` is zero or above
/// [`MAX_YEARS_OF_OPERATION`], or a value is non-finite.
pub fn internal_rate_of_return(
    cost: f64,
    savings: f64,
    years: u32,
) -> ForecastResult<Option<f64>> {
    validate_inputs(cost, savings, years, 0.0)?;
    if savings <= 0.0 {
        return Ok(None);
    }

    let mut lo = IRR_LOWER_BOUND;
    let mut hi = IRR_UPPER_BOUND;
    let npv_lo = npv_unchecked(cost, savings, years, lo);
    let npv_hi = npv_unchecked(cost, savings, years, hi);

    if npv_lo == 0.0 {
        return Ok(Some(lo));
    }
    if npv_hi == 0.0 {
        return Ok(Some(hi));
    }
    if npv_lo.is_sign_positive() == npv_hi.is_sign_positive() {
        log::debug!(
            "IRR not bracketed by [{}, {}]: NPV {} and {}",
            lo,
            hi,
            npv_lo,
            npv_hi
        );
        return Ok(None);
    }

    let lo_positive = npv_lo.is_sign_positive();
    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let npv_mid = npv_unchecked(cost, savings, years, mid);
        if npv_mid == 0.0 {
            return Ok(Some(mid));
        }
        if npv_mid.is_sign_positive() == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < IRR_TOLERANCE {
            break;
        }
    }

    Ok(Some(0.5 * (lo + hi)))
}

/// Payback, ROI, NPV and IRR for an efficiency measure.
///
/// Zero or negative savings are not an error: the payback period is
/// `+∞` and the IRR is `None`.
///
/// # Errors
/// `InvalidParameter` if `cost` is not positive, `years` is zero or above
/// [`MAX_YEARS_OF_OPERATION`], or a value is non-finite or `rate <= -1`.
///
/// # Example
/// ```rust
/// use energy_forecast::roi::calculate_roi;
///
/// let result = calculate_roi(10_000.0, 2_000.0, 10, 0.05).unwrap();
/// assert!((result.simple_payback_period - 5.0).abs() < 1e-12);
/// assert!((result.roi - 1.0).abs() < 1e-12);
/// assert!(result.npv > 0.0);
/// assert!(result.irr.unwrap() > 0.0);
/// ```
pub fn calculate_roi(
    implementation_cost: f64,
    annual_savings: f64,
    years_of_operation: u32,
    discount_rate: f64,
) -> ForecastResult<RoiResult> {
    validate_inputs(
        implementation_cost,
        annual_savings,
        years_of_operation,
        discount_rate,
    )?;

    let simple_payback_period = if annual_savings <= 0.0 {
        f64::INFINITY
    } else {
        implementation_cost / annual_savings
    };
    let total_savings = annual_savings * f64::from(years_of_operation);
    let roi = (total_savings - implementation_cost) / implementation_cost;
    let npv = npv_unchecked(
        implementation_cost,
        annual_savings,
        years_of_operation,
        discount_rate,
    );
    let irr = internal_rate_of_return(implementation_cost, annual_savings, years_of_operation)?;

    Ok(RoiResult {
        simple_payback_period,
        roi,
        npv,
        irr,
    })
}

/// [`calculate_roi`] at [`DEFAULT_DISCOUNT_RATE`].
pub fn calculate_roi_default(
    implementation_cost: f64,
    annual_savings: f64,
    years_of_operation: u32,
) -> ForecastResult<RoiResult> {
    calculate_roi(
        implementation_cost,
        annual_savings,
        years_of_operation,
        DEFAULT_DISCOUNT_RATE,
    )
}

/// Fractional year at which cumulative discounted savings cover the cost.
///
/// Interpolates linearly within the crossing year. `+∞` if the cost is not
/// recovered within `years`.
///
/// # Errors
/// Same input validation as [`calculate_roi`].
pub fn discounted_payback_period(
    cost: f64,
    savings: f64,
    years: u32,
    rate: f64,
) -> ForecastResult<f64> {
    validate_inputs(cost, savings, years, rate)?;
    if savings <= 0.0 {
        return Ok(f64::INFINITY);
    }

    let mut remaining = cost;
    for t in 1..=years {
        let discounted = savings * discount_factor(rate, t);
        if discounted >= remaining {
            return Ok(f64::from(t - 1) + remaining / discounted);
        }
        remaining -= discounted;
    }
    Ok(f64::INFINITY)
}

fn to_cents(value: f64, parameter: &str) -> ForecastResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| {
            ForecastError::invalid_parameter(parameter, value, "representable as a decimal amount")
        })
}

/// Year-by-year cash flows rounded to cents.
///
/// Row 0 holds the negated cost; rows `1..=years` hold the savings. The
/// cumulative column sums the rounded discounted amounts exactly.
///
/// # Errors
/// Same input validation as [`calculate_roi`], plus `InvalidParameter` if
/// an amount does not fit a `Decimal`.
pub fn cash_flow_schedule(
    cost: f64,
    savings: f64,
    years: u32,
    rate: f64,
) -> ForecastResult<Vec<CashFlowYear>> {
    validate_inputs(cost, savings, years, rate)?;

    let upfront = -to_cents(cost, "implementation_cost")?;
    let nominal_savings = to_cents(savings, "annual_savings")?;

    let mut schedule = Vec::with_capacity(years as usize + 1);
    schedule.push(CashFlowYear {
        year: 0,
        nominal: upfront,
        discounted: upfront,
        cumulative_discounted: upfront,
    });

    let mut cumulative = upfront;
    for t in 1..=years {
        let discounted = to_cents(savings * discount_factor(rate, t), "discounted_savings")?;
        cumulative = cumulative.checked_add(discounted).ok_or_else(|| {
            ForecastError::invalid_parameter("annual_savings", savings, "cumulative total overflow")
        })?;
        schedule.push(CashFlowYear {
            year: t,
            nominal: nominal_savings,
            discounted,
            cumulative_discounted: cumulative,
        });
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_savings_never_pays_back() {
        let result = calculate_roi(10_000.0, 0.0, 10, 0.05).unwrap();
        assert!(result.simple_payback_period.is_infinite());
        assert!(result.simple_payback_period > 0.0);
        assert!(result.roi < 0.0);
        assert_approx_eq!(result.roi, -1.0, 1e-12);
        assert_approx_eq!(result.npv, -10_000.0, 1e-9);
        assert_eq!(result.irr, None);
    }

    #[test]
    fn test_typical_retrofit() {
        let result = calculate_roi(10_000.0, 2_000.0, 10, 0.05).unwrap();
        assert_approx_eq!(result.simple_payback_period, 5.0, 1e-12);
        assert_approx_eq!(result.roi, 1.0, 1e-12);
        assert_approx_eq!(result.npv, 5443.47, 0.01);
        let irr = result.irr.unwrap();
        assert_approx_eq!(irr, 0.1510, 1e-3);
        // NPV at the IRR is zero
        assert_approx_eq!(net_present_value(10_000.0, 2_000.0, 10, irr).unwrap(), 0.0, 1e-5);
    }

    #[test]
    fn test_negative_savings() {
        let result = calculate_roi(5_000.0, -100.0, 5, 0.03).unwrap();
        assert!(result.simple_payback_period.is_infinite());
        assert!(result.roi < -1.0);
        assert!(result.npv < -5_000.0);
        assert_eq!(result.irr, None);
    }

    #[test]
    fn test_irr_outside_search_interval() {
        // Savings of 20x the cost in one year imply an IRR of 19
        let irr = internal_rate_of_return(100.0, 2_000.0, 1).unwrap();
        assert_eq!(irr, None);
    }

    #[test]
    fn test_zero_discount_rate() {
        let npv = net_present_value(1_000.0, 300.0, 4, 0.0).unwrap();
        assert_approx_eq!(npv, 200.0, 1e-9);
    }

    #[test]
    fn test_default_rate() {
        let a = calculate_roi_default(8_000.0, 1_500.0, 12).unwrap();
        let b = calculate_roi(8_000.0, 1_500.0, 12, DEFAULT_DISCOUNT_RATE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_validation() {
        for (cost, savings, years, rate) in [
            (0.0, 100.0, 5, 0.05),
            (-10.0, 100.0, 5, 0.05),
            (f64::NAN, 100.0, 5, 0.05),
            (100.0, f64::INFINITY, 5, 0.05),
            (100.0, 10.0, 0, 0.05),
            (100.0, 10.0, 5, -1.0),
            (100.0, 10.0, 5, f64::NAN),
        ] {
            assert!(
                matches!(
                    calculate_roi(cost, savings, years, rate),
                    Err(ForecastError::InvalidParameter { .. })
                ),
                "({}, {}, {}, {}) should be rejected",
                cost,
                savings,
                years,
                rate
            );
        }
    }

    #[test]
    fn test_operating_period_cap() {
        assert!(calculate_roi(10_000.0, 2_000.0, MAX_YEARS_OF_OPERATION, 0.05).is_ok());
        assert_eq!(
            cash_flow_schedule(10_000.0, 2_000.0, MAX_YEARS_OF_OPERATION, 0.05)
                .unwrap()
                .len(),
            MAX_YEARS_OF_OPERATION as usize + 1
        );
        for years in [MAX_YEARS_OF_OPERATION + 1, 2_000_000, u32::MAX] {
            match calculate_roi(10_000.0, 2_000.0, years, 0.05) {
                Err(ForecastError::InvalidParameter { parameter, .. }) => {
                    assert_eq!(parameter, "years_of_operation")
                }
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
            assert!(cash_flow_schedule(10_000.0, 2_000.0, years, 0.05).is_err());
        }
    }

    #[test]
    fn test_closed_form_matches_yearly_discounting() {
        for rate in [-0.5, 0.0, 1e-9, 0.05, 0.3] {
            let summed: f64 = (1..=25).map(|t| 750.0 * discount_factor(rate, t)).sum();
            let npv = net_present_value(4_000.0, 750.0, 25, rate).unwrap();
            assert_approx_eq!(npv, summed - 4_000.0, 1e-6 * summed.abs().max(1.0));
        }
    }

    #[test]
    fn test_discounted_payback() {
        let undiscounted = discounted_payback_period(1_000.0, 250.0, 10, 0.0).unwrap();
        assert_approx_eq!(undiscounted, 4.0, 1e-12);

        let discounted = discounted_payback_period(10_000.0, 2_000.0, 10, 0.05).unwrap();
        assert!(discounted > 5.0 && discounted < 7.0);

        let never = discounted_payback_period(10_000.0, 1_000.0, 10, 0.05).unwrap();
        assert!(never.is_infinite());
    }

    #[test]
    fn test_cash_flow_schedule() {
        let schedule = cash_flow_schedule(1_000.0, 400.0, 3, 0.10).unwrap();
        assert_eq!(schedule.len(), 4);

        assert_eq!(schedule[0].year, 0);
        assert_eq!(schedule[0].nominal, dec!(-1000));
        assert_eq!(schedule[0].cumulative_discounted, dec!(-1000));

        assert_eq!(schedule[1].nominal, dec!(400));
        assert_eq!(schedule[1].discounted, dec!(363.64));
        assert_eq!(schedule[2].discounted, dec!(330.58));
        assert_eq!(schedule[3].discounted, dec!(300.53));
        assert_eq!(schedule[3].cumulative_discounted, dec!(-5.25));
    }
}

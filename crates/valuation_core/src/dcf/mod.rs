//! Deterministic discounted cash flow functions.
//!
//! All functions are pure and never return a non-finite value: inputs that
//! would produce NaN or infinity are refused with
//! [`ValuationError::InvalidRate`].
//!
//! # Formulae
//!
//! | Function | Definition |
//! |----------|------------|
//! | [`terminal_value`] | `CF_n (1 + g) / (r - g)` |
//! | [`discounted_sum`] | `Σ CF_i / (1 + r)^i`, `i = 1..n` |
//! | [`intrinsic_value`] | `discounted_sum + terminal_value / (1 + r)^n` |
//! | [`point_intrinsic_value`] | `discounted_sum + terminal_value` |
//!
//! # Two intrinsic value forms
//!
//! [`intrinsic_value`] discounts the terminal value back to the present and is
//! the form evaluated per Monte Carlo sample. [`point_intrinsic_value`] adds
//! the undiscounted terminal value and is the form reported for the single
//! deterministic estimate. The two are intentionally kept apart; callers pick
//! the one whose figures they need to reproduce.
//!
//! # Examples
//!
//! ```rust
//! use valuation_core::dcf::{intrinsic_value, point_intrinsic_value};
//! use valuation_core::types::CashFlowSeries;
//!
//! let flows = CashFlowSeries::new(vec![100.0; 5]).unwrap();
//!
//! let simulated_form = intrinsic_value(&flows, 0.10, 0.03).unwrap();
//! let point_form = point_intrinsic_value(&flows, 0.10, 0.03).unwrap();
//!
//! // Undiscounted terminal value makes the point form larger
//! assert!(point_form > simulated_form);
//! ```

use crate::types::{CashFlowSeries, ValuationError};

/// Gordon growth terminal value at the end of the forecast horizon.
///
/// Computes `last_cash_flow * (1 + growth_rate) / (discount_rate - growth_rate)`.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidRate`] if:
/// - any argument is NaN or infinite
/// - `discount_rate <= growth_rate` (the perpetuity does not converge)
/// - the quotient overflows
///
/// # Examples
///
/// ```rust
/// use valuation_core::dcf::terminal_value;
///
/// let tv = terminal_value(100.0, 0.03, 0.10).unwrap();
/// assert!((tv - 100.0 * 1.03 / 0.07).abs() < 1e-9);
///
/// assert!(terminal_value(100.0, 0.10, 0.10).is_err());
/// ```
pub fn terminal_value(
    last_cash_flow: f64,
    growth_rate: f64,
    discount_rate: f64,
) -> Result<f64, ValuationError> {
    ensure_finite("last_cash_flow", last_cash_flow)?;
    ensure_finite("growth_rate", growth_rate)?;
    ensure_finite("discount_rate", discount_rate)?;

    if discount_rate <= growth_rate {
        return Err(ValuationError::invalid_rate(
            "discount_rate",
            discount_rate,
            "must exceed the growth rate",
        ));
    }

    let value = last_cash_flow * (1.0 + growth_rate) / (discount_rate - growth_rate);
    if !value.is_finite() {
        return Err(ValuationError::invalid_rate(
            "discount_rate",
            discount_rate,
            "produces a non-finite terminal value",
        ));
    }
    Ok(value)
}

/// Present value of each forecast cash flow, period 1 first.
///
/// Element `i - 1` holds `CF_i / (1 + discount_rate)^i`.
///
/// # Errors
///
/// Same conditions as [`discounted_sum`].
pub fn present_values(
    cash_flows: &CashFlowSeries,
    discount_rate: f64,
) -> Result<Vec<f64>, ValuationError> {
    let base = growth_base(discount_rate)?;

    cash_flows
        .periods()
        .map(|(period, cf)| {
            let pv = cf / base.powi(period as i32);
            if pv.is_finite() {
                Ok(pv)
            } else {
                Err(ValuationError::invalid_rate(
                    "discount_rate",
                    discount_rate,
                    "produces a non-finite present value",
                ))
            }
        })
        .collect()
}

/// Sum of forecast cash flows discounted at `discount_rate`.
///
/// Computes `Σ cash_flows[i] / (1 + discount_rate)^i` for `i = 1..n`.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidRate`] if `discount_rate` is non-finite,
/// `discount_rate <= -1`, or the sum is non-finite.
///
/// # Examples
///
/// ```rust
/// use valuation_core::dcf::discounted_sum;
/// use valuation_core::types::CashFlowSeries;
///
/// let flows = CashFlowSeries::new(vec![100.0; 5]).unwrap();
/// let pv = discounted_sum(&flows, 0.10).unwrap();
/// assert!((pv - 379.0787).abs() < 1e-4);
///
/// assert!(discounted_sum(&flows, -1.0).is_err());
/// ```
pub fn discounted_sum(
    cash_flows: &CashFlowSeries,
    discount_rate: f64,
) -> Result<f64, ValuationError> {
    let total: f64 = present_values(cash_flows, discount_rate)?.iter().sum();
    if !total.is_finite() {
        return Err(ValuationError::invalid_rate(
            "discount_rate",
            discount_rate,
            "produces a non-finite discounted sum",
        ));
    }
    Ok(total)
}

/// Intrinsic value with the terminal value discounted to the present.
///
/// Computes `discounted_sum + terminal_value(CF_n) / (1 + r)^n`. This is the
/// per-sample valuation used by the Monte Carlo simulator.
///
/// # Errors
///
/// Any error from [`discounted_sum`] or [`terminal_value`].
pub fn intrinsic_value(
    cash_flows: &CashFlowSeries,
    discount_rate: f64,
    growth_rate: f64,
) -> Result<f64, ValuationError> {
    let explicit = discounted_sum(cash_flows, discount_rate)?;
    let terminal = terminal_value(cash_flows.last(), growth_rate, discount_rate)?;
    let horizon = growth_base(discount_rate)?.powi(cash_flows.len() as i32);

    finite_total(explicit + terminal / horizon, discount_rate)
}

/// Intrinsic value with the terminal value added undiscounted.
///
/// Computes `discounted_sum + terminal_value(CF_n)`. This is the single-point
/// estimate reported alongside the DCF; it does not match
/// [`intrinsic_value`] for the same inputs.
///
/// # Errors
///
/// Any error from [`discounted_sum`] or [`terminal_value`].
pub fn point_intrinsic_value(
    cash_flows: &CashFlowSeries,
    discount_rate: f64,
    growth_rate: f64,
) -> Result<f64, ValuationError> {
    Ok(point_estimate(cash_flows, discount_rate, growth_rate)?.intrinsic_value)
}

/// Components of a deterministic single-point valuation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointEstimate {
    /// Discount rate used (fractional).
    pub discount_rate: f64,
    /// Terminal growth rate used (fractional).
    pub growth_rate: f64,
    /// Sum of discounted explicit-period cash flows.
    pub discounted_sum: f64,
    /// Undiscounted Gordon growth terminal value.
    pub terminal_value: f64,
    /// `discounted_sum + terminal_value`.
    pub intrinsic_value: f64,
}

/// Computes every figure of the deterministic estimate in one pass.
///
/// # Errors
///
/// Any error from [`discounted_sum`] or [`terminal_value`].
///
/// # Examples
///
/// ```rust
/// use valuation_core::dcf::point_estimate;
/// use valuation_core::types::CashFlowSeries;
///
/// let flows = CashFlowSeries::new(vec![100.0; 5]).unwrap();
/// let estimate = point_estimate(&flows, 0.10, 0.03).unwrap();
/// assert_eq!(
///     estimate.intrinsic_value,
///     estimate.discounted_sum + estimate.terminal_value
/// );
/// ```
pub fn point_estimate(
    cash_flows: &CashFlowSeries,
    discount_rate: f64,
    growth_rate: f64,
) -> Result<PointEstimate, ValuationError> {
    let explicit = discounted_sum(cash_flows, discount_rate)?;
    let terminal = terminal_value(cash_flows.last(), growth_rate, discount_rate)?;
    let total = finite_total(explicit + terminal, discount_rate)?;

    Ok(PointEstimate {
        discount_rate,
        growth_rate,
        discounted_sum: explicit,
        terminal_value: terminal,
        intrinsic_value: total,
    })
}

/// Validates `discount_rate` and returns `1 + discount_rate`.
fn growth_base(discount_rate: f64) -> Result<f64, ValuationError> {
    ensure_finite("discount_rate", discount_rate)?;
    if discount_rate <= -1.0 {
        return Err(ValuationError::invalid_rate(
            "discount_rate",
            discount_rate,
            "must be greater than -1",
        ));
    }
    Ok(1.0 + discount_rate)
}

#[inline]
fn ensure_finite(name: &'static str, value: f64) -> Result<(), ValuationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValuationError::invalid_rate(name, value, "must be finite"))
    }
}

#[inline]
fn finite_total(total: f64, discount_rate: f64) -> Result<f64, ValuationError> {
    if total.is_finite() {
        Ok(total)
    } else {
        Err(ValuationError::invalid_rate(
            "discount_rate",
            discount_rate,
            "produces a non-finite intrinsic value",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_flows() -> CashFlowSeries {
        CashFlowSeries::new(vec![100.0; 5]).unwrap()
    }

    #[test]
    fn test_discounted_sum_reference_value() {
        let pv = discounted_sum(&flat_flows(), 0.10).unwrap();
        let expected: f64 = (1..=5).map(|i| 100.0 / 1.1_f64.powi(i)).sum();
        assert_relative_eq!(pv, expected, epsilon = 1e-10);
        assert_relative_eq!(pv, 379.08, epsilon = 0.01);
    }

    #[test]
    fn test_discounted_sum_zero_rate() {
        let pv = discounted_sum(&flat_flows(), 0.0).unwrap();
        assert_relative_eq!(pv, 500.0, epsilon = 1e-12);
    }

    #[test]
    fn test_discounted_sum_is_repeatable() {
        let flows = CashFlowSeries::new(vec![3.1, -0.7, 12.9, 4.4]).unwrap();
        let first = discounted_sum(&flows, 0.0871).unwrap();
        let second = discounted_sum(&flows, 0.0871).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_discounted_sum_rejects_minus_one() {
        let err = discounted_sum(&flat_flows(), -1.0).unwrap_err();
        assert!(err.is_invalid_rate());

        let err = discounted_sum(&flat_flows(), -1.5).unwrap_err();
        assert!(err.is_invalid_rate());
    }

    #[test]
    fn test_discounted_sum_rejects_nan() {
        assert!(discounted_sum(&flat_flows(), f64::NAN).is_err());
        assert!(discounted_sum(&flat_flows(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_discounted_sum_overflow_is_refused() {
        // (1 + r)^i underflows towards zero for r just above -1
        let flows = CashFlowSeries::new(vec![f64::MAX; 3]).unwrap();
        assert!(discounted_sum(&flows, -0.999_999).is_err());
    }

    #[test]
    fn test_present_values_per_period() {
        let pvs = present_values(&flat_flows(), 0.10).unwrap();
        assert_eq!(pvs.len(), 5);
        assert_relative_eq!(pvs[0], 100.0 / 1.1, epsilon = 1e-12);
        assert_relative_eq!(pvs[4], 100.0 / 1.1_f64.powi(5), epsilon = 1e-12);
    }

    #[test]
    fn test_terminal_value_reference_value() {
        let tv = terminal_value(100.0, 0.03, 0.10).unwrap();
        assert_relative_eq!(tv, 100.0 * 1.03 / 0.07, epsilon = 1e-10);
        assert_relative_eq!(tv, 1471.43, epsilon = 0.01);
    }

    #[test]
    fn test_terminal_value_requires_discount_above_growth() {
        assert!(terminal_value(100.0, 0.05, 0.05).unwrap_err().is_invalid_rate());
        assert!(terminal_value(100.0, 0.08, 0.05).unwrap_err().is_invalid_rate());
    }

    #[test]
    fn test_terminal_value_rejects_non_finite_inputs() {
        assert!(terminal_value(f64::NAN, 0.03, 0.10).is_err());
        assert!(terminal_value(100.0, f64::NAN, 0.10).is_err());
        assert!(terminal_value(100.0, 0.03, f64::INFINITY).is_err());
    }

    #[test]
    fn test_terminal_value_overflow_is_refused() {
        assert!(terminal_value(f64::MAX, 0.03, 0.04).is_err());
    }

    #[test]
    fn test_terminal_value_negative_cash_flow() {
        let tv = terminal_value(-50.0, 0.02, 0.12).unwrap();
        assert!(tv < 0.0);
    }

    #[test]
    fn test_intrinsic_value_discounts_terminal() {
        let flows = flat_flows();
        let value = intrinsic_value(&flows, 0.10, 0.03).unwrap();
        let expected =
            discounted_sum(&flows, 0.10).unwrap() + (100.0 * 1.03 / 0.07) / 1.1_f64.powi(5);
        assert_relative_eq!(value, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_point_intrinsic_value_adds_undiscounted_terminal() {
        let flows = flat_flows();
        let value = point_intrinsic_value(&flows, 0.10, 0.03).unwrap();
        let expected = discounted_sum(&flows, 0.10).unwrap() + 100.0 * 1.03 / 0.07;
        assert_relative_eq!(value, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_forms_differ() {
        let flows = flat_flows();
        let simulated = intrinsic_value(&flows, 0.10, 0.03).unwrap();
        let point = point_intrinsic_value(&flows, 0.10, 0.03).unwrap();
        assert!(point > simulated);
    }

    #[test]
    fn test_intrinsic_value_below_minus_one_refused() {
        // Growth below discount passes the Gordon check but the base is invalid
        let err = intrinsic_value(&flat_flows(), -1.2, -1.5).unwrap_err();
        assert!(err.is_invalid_rate());
    }

    #[test]
    fn test_point_estimate_components() {
        let estimate = point_estimate(&flat_flows(), 0.10, 0.03).unwrap();
        assert_eq!(estimate.discount_rate, 0.10);
        assert_eq!(estimate.growth_rate, 0.03);
        assert_relative_eq!(estimate.discounted_sum, 379.0787, epsilon = 1e-4);
        assert_relative_eq!(estimate.terminal_value, 1471.4286, epsilon = 1e-4);
        assert_relative_eq!(
            estimate.intrinsic_value,
            estimate.discounted_sum + estimate.terminal_value,
            epsilon = 1e-12
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn cash_flow_strategy() -> impl Strategy<Value = f64> {
            1.0..1e9
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_terminal_value_positive_and_monotone(
                cf in cash_flow_strategy(),
                g in 0.001..0.08_f64,
                spread in 0.001..0.2_f64,
                bump in 1e-4..0.01_f64,
            ) {
                let r = g + spread;
                let base = terminal_value(cf, g, r).unwrap();
                prop_assert!(base > 0.0);

                // Higher growth, same discount rate
                let g_up = (g + bump).min(r - spread * 0.5);
                if g_up > g {
                    prop_assert!(terminal_value(cf, g_up, r).unwrap() > base);
                }

                // Higher discount rate, same growth
                prop_assert!(terminal_value(cf, g, r + bump).unwrap() < base);
            }

            #[test]
            fn test_discounted_sum_decreasing_in_rate(
                cf in cash_flow_strategy(),
                r in 0.0..0.5_f64,
                bump in 1e-4..0.1_f64,
            ) {
                let flows = CashFlowSeries::new(vec![cf; 5]).unwrap();
                let low = discounted_sum(&flows, r).unwrap();
                let high = discounted_sum(&flows, r + bump).unwrap();
                prop_assert!(high < low);
            }
        }
    }
}

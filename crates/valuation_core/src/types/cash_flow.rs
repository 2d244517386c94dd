//! Forecast cash flow series.
//!
//! A [`CashFlowSeries`] holds one monetary amount per future period, period 1
//! first. Construction validates the series once so the DCF functions can
//! assume a non-empty, finite input.

use super::error::ValuationError;

/// Ordered, immutable sequence of forecast free cash flows.
///
/// Amounts may be positive or negative but must be finite. The series always
/// has at least one period.
///
/// # Examples
///
/// ```rust
/// use valuation_core::types::CashFlowSeries;
///
/// let flows = CashFlowSeries::new(vec![120.0, 130.0, 145.0]).unwrap();
/// assert_eq!(flows.len(), 3);
/// assert_eq!(flows.last(), 145.0);
///
/// assert!(CashFlowSeries::new(vec![]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CashFlowSeries {
    amounts: Vec<f64>,
}

impl CashFlowSeries {
    /// Creates a series from per-period amounts, period 1 first.
    ///
    /// # Errors
    ///
    /// - [`ValuationError::EmptyCashFlows`] if `amounts` is empty
    /// - [`ValuationError::NonFiniteCashFlow`] if any amount is NaN or infinite
    pub fn new(amounts: Vec<f64>) -> Result<Self, ValuationError> {
        if amounts.is_empty() {
            return Err(ValuationError::EmptyCashFlows);
        }
        if let Some((idx, &value)) = amounts.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ValuationError::NonFiniteCashFlow {
                period: idx + 1,
                value,
            });
        }
        Ok(Self { amounts })
    }

    /// Number of forecast periods (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cash flow of the final forecast period.
    #[inline]
    pub fn last(&self) -> f64 {
        self.amounts[self.amounts.len() - 1]
    }

    /// Per-period amounts, period 1 first.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.amounts
    }

    /// Iterates over `(period, amount)` pairs with 1-based periods.
    pub fn periods(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.amounts.iter().enumerate().map(|(i, &cf)| (i + 1, cf))
    }
}

impl TryFrom<Vec<f64>> for CashFlowSeries {
    type Error = ValuationError;

    fn try_from(amounts: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(amounts)
    }
}

impl TryFrom<&[f64]> for CashFlowSeries {
    type Error = ValuationError;

    fn try_from(amounts: &[f64]) -> Result<Self, Self::Error> {
        Self::new(amounts.to_vec())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CashFlowSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            amounts: Vec<f64>,
        }
        let raw = Raw::deserialize(deserializer)?;
        CashFlowSeries::new(raw.amounts).map_err(serde::de::Error::custom)
    }
}

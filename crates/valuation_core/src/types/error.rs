//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValuationError`: Errors from cash flow construction and DCF computation

use thiserror::Error;

/// Categorised valuation errors.
///
/// The valuation engine never returns a NaN or infinite value. Any input that
/// would produce one is refused with [`ValuationError::InvalidRate`].
///
/// # Variants
/// - `InvalidRate`: A rate is outside its domain, non-finite, or drives the result non-finite
/// - `EmptyCashFlows`: A cash flow series was constructed with no periods
/// - `NonFiniteCashFlow`: A cash flow amount is NaN or infinite
///
/// # Examples
/// ```
/// use valuation_core::types::ValuationError;
///
/// let err = ValuationError::invalid_rate("discount_rate", -1.0, "must be greater than -1");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid rate 'discount_rate' = -1: must be greater than -1"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// A rate argument cannot be used for the requested computation.
    #[error("Invalid rate '{name}' = {value}: {reason}")]
    InvalidRate {
        /// Name of the offending argument
        name: &'static str,
        /// The value that was supplied
        value: f64,
        /// Why the value was refused
        reason: &'static str,
    },

    /// A cash flow series needs at least one period.
    #[error("Cash flow series must contain at least one period")]
    EmptyCashFlows,

    /// A cash flow amount is NaN or infinite.
    #[error("Non-finite cash flow {value} at period {period}")]
    NonFiniteCashFlow {
        /// 1-based period index
        period: usize,
        /// The offending amount
        value: f64,
    },
}

impl ValuationError {
    /// Shorthand for [`ValuationError::InvalidRate`].
    #[inline]
    pub fn invalid_rate(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidRate {
            name,
            value,
            reason,
        }
    }

    /// Returns `true` for [`ValuationError::InvalidRate`].
    #[inline]
    pub fn is_invalid_rate(&self) -> bool {
        matches!(self, Self::InvalidRate { .. })
    }
}

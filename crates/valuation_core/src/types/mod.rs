//! Core value types for DCF valuation.
//!
//! - [`CashFlowSeries`]: validated, immutable forecast of per-period cash flows
//! - [`ValuationError`]: failures raised by the valuation engine

pub mod cash_flow;
pub mod error;

pub use cash_flow::CashFlowSeries;
pub use error::ValuationError;

//! # valuation_core: Discounted Cash Flow Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! valuation_core is the bottom layer of the valuation workspace, providing:
//! - Forecast cash flow container: `CashFlowSeries` (`types::cash_flow`)
//! - Error types: `ValuationError` (`types::error`)
//! - Deterministic DCF functions: terminal value, discounted sum, intrinsic value (`dcf`)
//! - Descriptive statistics over simulated values (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other valuation_* crates and no random state.
//! Every function is pure; identical inputs give bit-identical outputs.
//!
//! ## Usage Examples
//!
//! ```rust
//! use valuation_core::dcf::{discounted_sum, terminal_value};
//! use valuation_core::types::CashFlowSeries;
//!
//! let flows = CashFlowSeries::new(vec![100.0; 5]).unwrap();
//! let pv = discounted_sum(&flows, 0.10).unwrap();
//! assert!((pv - 379.08).abs() < 0.01);
//!
//! let tv = terminal_value(100.0, 0.03, 0.10).unwrap();
//! assert!((tv - 1471.43).abs() < 0.01);
//! ```
//!
//! ## Rate Convention
//!
//! All rates are fractional (`0.1154`, not `11.54`). Converting user-facing
//! percentages is the caller's job.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `CashFlowSeries`, `PointEstimate`, `SummaryStatistics` and `Histogram`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod dcf;
pub mod math;
pub mod types;

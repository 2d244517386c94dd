//! Monte Carlo simulation of DCF intrinsic value.
//!
//! This module samples the discount rate and terminal growth rate from
//! independent normal distributions, values each admissible draw with
//! [`valuation_core::dcf::intrinsic_value`], and summarises the resulting
//! distribution.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloSimulator
//! ├── SimulationConfig   (cash flows, rate distributions, sample count)
//! ├── ParallelConfig     (chunking for seeded parallel runs)
//! ├── ValuationRng       (injected random source)
//! ├── CancellationToken  (polled every CANCEL_CHECK_INTERVAL samples)
//! └── SimulationOutcome  (values, mean, p5, p95, rejected count)
//! ```
//!
//! # Rejection Rule
//!
//! A draw with `discount_rate <= growth_rate` sits on or past the Gordon
//! growth singularity. It is counted in
//! [`SimulationOutcome::rejected_count`] and never valued. A run in which
//! every draw is rejected fails with [`SimulationError::EmptySimulation`].
//!
//! # Examples
//!
//! ```rust
//! use valuation_core::types::CashFlowSeries;
//! use valuation_mc::mc::{
//!     DistributionSpec, MonteCarloSimulator, SimulationConfig, SimulationError,
//! };
//! use valuation_mc::rng::ValuationRng;
//!
//! let config = SimulationConfig::builder()
//!     .cash_flows(CashFlowSeries::new(vec![100.0; 5]).unwrap())
//!     .discount_rate(DistributionSpec::new(0.01, 0.001))
//!     .growth_rate(DistributionSpec::new(0.5, 0.001))
//!     .sample_count(100)
//!     .build()
//!     .unwrap();
//!
//! let simulator = MonteCarloSimulator::new(config).unwrap();
//! let result = simulator.run(&mut ValuationRng::from_seed(42));
//! assert!(matches!(result, Err(SimulationError::EmptySimulation { rejected: 100 })));
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod outcome;
pub mod simulator;

// Re-exports for convenient access
pub use cancel::{CancellationToken, CANCEL_CHECK_INTERVAL};
pub use config::{DistributionSpec, SimulationConfig, SimulationConfigBuilder, MAX_SAMPLES};
pub use error::{ConfigError, SimulationError};
pub use outcome::SimulationOutcome;
pub use simulator::{MonteCarloSimulator, ParallelConfig, DEFAULT_CHUNK_SIZE};

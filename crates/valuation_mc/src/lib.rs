//! # valuation_mc: Monte Carlo DCF Simulation (Layer 2)
//!
//! ## Layer 2 Role
//!
//! valuation_mc quantifies valuation uncertainty on top of `valuation_core`:
//! - Seedable random source for reproducible draws (`rng`)
//! - Simulation configuration, sampling loop and summary outcome (`mc`)
//! - Optional rayon-parallel sampling over independent seed streams
//! - Cooperative cancellation for long runs
//!
//! ## Usage Example
//!
//! ```rust
//! use valuation_core::types::CashFlowSeries;
//! use valuation_mc::mc::{DistributionSpec, MonteCarloSimulator, SimulationConfig};
//! use valuation_mc::rng::ValuationRng;
//!
//! let config = SimulationConfig::builder()
//!     .cash_flows(CashFlowSeries::new(vec![100.0, 110.0, 121.0]).unwrap())
//!     .discount_rate(DistributionSpec::new(0.10, 0.01))
//!     .growth_rate(DistributionSpec::new(0.03, 0.01))
//!     .sample_count(1_000)
//!     .build()
//!     .unwrap();
//!
//! let simulator = MonteCarloSimulator::new(config).unwrap();
//! let mut rng = ValuationRng::from_seed(42);
//! let outcome = simulator.run(&mut rng).unwrap();
//!
//! assert_eq!(outcome.values().len() + outcome.rejected_count(), 1_000);
//! assert!(outcome.p5() <= outcome.p95());
//! ```
//!
//! ## Determinism
//!
//! Runs are pure functions of the configuration and the seed. Parallel runs
//! split the sample budget into fixed-size chunks, each with its own seed
//! stream, so the result does not depend on the number of worker threads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;

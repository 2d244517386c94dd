//! # Random Number Generation
//!
//! Seedable random source for the Monte Carlo simulator.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator is created from an explicit seed
//! - **Injection**: the simulator never owns global random state; callers pass
//!   a [`ValuationRng`] in, or a seed for parallel runs
//! - **Independent streams**: [`ValuationRng::for_stream`] derives decorrelated
//!   generators for parallel chunks from one base seed
//!
//! ## Usage Example
//!
//! ```rust
//! use valuation_mc::rng::ValuationRng;
//!
//! let mut rng = ValuationRng::from_seed(12345);
//! let u = rng.gen_uniform();
//! let z = rng.gen_normal();
//! assert!((0.0..1.0).contains(&u));
//! assert!(z.is_finite());
//! ```

mod prng;

pub use prng::ValuationRng;

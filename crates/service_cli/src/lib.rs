//! # service_cli: DCF valuation command line front end
//!
//! Collects valuation inputs from flags, environment and a TOML file, runs
//! the deterministic estimate or the Monte Carlo simulation, and renders the
//! result as a table or JSON.
//!
//! The binary lives in `main.rs`; everything it calls is exposed here so the
//! commands can be tested without spawning a process.

pub mod commands;
pub mod config;
pub mod error;

pub use error::{CliError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

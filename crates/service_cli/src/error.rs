//! CLI error types.

use thiserror::Error;
use valuation_core::types::ValuationError;
use valuation_mc::mc::{ConfigError as SimulationConfigError, SimulationError};

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A command-line argument could not be used.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Deterministic valuation failed.
    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    /// Simulation parameters were rejected.
    #[error("Invalid simulation parameters: {0}")]
    SimulationConfig(#[from] SimulationConfigError),

    /// Simulation run failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Report could not be encoded as JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns `true` when a simulation produced no valid samples.
    pub fn is_insufficient_samples(&self) -> bool {
        matches!(
            self,
            CliError::Simulation(SimulationError::EmptySimulation { .. })
        )
    }
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

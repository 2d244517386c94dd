//! Error types for the Monte Carlo simulator.
//!
//! - [`ConfigError`]: invalid simulation parameters, raised at construction
//! - [`SimulationError`]: failures of a simulation run

use thiserror::Error;
use valuation_core::math::statistics::StatisticsError;

/// Configuration error for the Monte Carlo simulator.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Sample count outside valid range [1, 10_000_000].
    #[error("Invalid sample count {0}: must be in range [1, 10_000_000]")]
    InvalidSampleCount(usize),

    /// Distribution parameter is non-finite or negative where it must not be.
    #[error("Invalid {name} distribution: {reason}")]
    InvalidDistribution {
        /// Which rate the distribution describes.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },

    /// Required builder field was not set.
    #[error("Missing parameter '{0}': must be specified")]
    MissingParameter(&'static str),

    /// Parallel chunk size of zero.
    #[error("Invalid chunk size {0}: must be at least 1")]
    InvalidChunkSize(usize),
}

/// Failure of a simulation run.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Every draw was rejected; no statistics can be computed.
    #[error("Insufficient valid samples: all {rejected} draws were rejected (discount rate <= growth rate)")]
    EmptySimulation {
        /// Number of rejected draws.
        rejected: usize,
    },

    /// The run was cancelled before all samples were drawn.
    #[error("Simulation cancelled after {completed} samples")]
    Cancelled {
        /// Samples drawn before cancellation was observed.
        completed: usize,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Statistics could not be computed.
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidSampleCount(0);
        assert!(err.to_string().contains("Invalid sample count 0"));

        let err = ConfigError::InvalidDistribution {
            name: "growth_rate",
            reason: "std_dev must be non-negative, got -0.1".to_string(),
        };
        assert!(err.to_string().contains("growth_rate"));

        let err = ConfigError::MissingParameter("cash_flows");
        assert_eq!(
            err.to_string(),
            "Missing parameter 'cash_flows': must be specified"
        );
    }

    #[test]
    fn test_simulation_error_display() {
        let err = SimulationError::EmptySimulation { rejected: 1000 };
        assert!(err.to_string().starts_with("Insufficient valid samples"));

        let err = SimulationError::Cancelled { completed: 2048 };
        assert_eq!(err.to_string(), "Simulation cancelled after 2048 samples");

        let err: SimulationError = ConfigError::InvalidSampleCount(0).into();
        assert!(matches!(err, SimulationError::Config(_)));
    }
}

//! Monte Carlo simulation configuration.
//!
//! This module provides the immutable [`SimulationConfig`] and its builder.
//! Rates are fractional; converting user-entered percentages happens before
//! the values reach this module.

use valuation_core::types::CashFlowSeries;

use super::error::ConfigError;

/// Maximum number of samples allowed per run.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Normal distribution of a rate parameter.
///
/// # Examples
///
/// ```rust
/// use valuation_mc::mc::DistributionSpec;
///
/// let wacc = DistributionSpec::new(0.1153, 0.01154);
/// assert_eq!(wacc.mean, 0.1153);
/// assert!(!wacc.is_degenerate());
///
/// assert!(DistributionSpec::fixed(0.035).is_degenerate());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionSpec {
    /// Mean of the rate (fractional).
    pub mean: f64,
    /// Standard deviation of the rate (fractional, non-negative).
    pub std_dev: f64,
}

impl DistributionSpec {
    /// Creates a normal distribution description.
    #[inline]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// A distribution that always yields `value`.
    #[inline]
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Returns `true` when the standard deviation is zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDistribution`] if the mean is non-finite or the
    /// standard deviation is negative or non-finite.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.mean.is_finite() {
            return Err(ConfigError::InvalidDistribution {
                name,
                reason: format!("mean must be finite, got {}", self.mean),
            });
        }
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(ConfigError::InvalidDistribution {
                name,
                reason: format!(
                    "std_dev must be finite and non-negative, got {}",
                    self.std_dev
                ),
            });
        }
        Ok(())
    }
}

/// Monte Carlo simulation configuration.
///
/// Immutable input to a simulation run. Use [`SimulationConfigBuilder`] to
/// construct instances.
///
/// # Examples
///
/// ```rust
/// use valuation_core::types::CashFlowSeries;
/// use valuation_mc::mc::{DistributionSpec, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .cash_flows(CashFlowSeries::new(vec![100.0; 5]).unwrap())
///     .discount_rate(DistributionSpec::new(0.10, 0.01))
///     .growth_rate(DistributionSpec::new(0.03, 0.005))
///     .sample_count(10_000)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.sample_count(), 10_000);
/// assert_eq!(config.cash_flows().len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationConfig {
    /// Forecast cash flows, period 1 first.
    cash_flows: CashFlowSeries,
    /// Distribution of the discount rate.
    discount_rate: DistributionSpec,
    /// Distribution of the terminal growth rate.
    growth_rate: DistributionSpec,
    /// Number of draws.
    sample_count: usize,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the forecast cash flows.
    #[inline]
    pub fn cash_flows(&self) -> &CashFlowSeries {
        &self.cash_flows
    }

    /// Returns the discount rate distribution.
    #[inline]
    pub fn discount_rate(&self) -> DistributionSpec {
        self.discount_rate
    }

    /// Returns the growth rate distribution.
    #[inline]
    pub fn growth_rate(&self) -> DistributionSpec {
        self.growth_rate
    }

    /// Returns the number of draws.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `sample_count` is 0 or greater than 10,000,000
    /// - either distribution has a non-finite mean or an invalid standard deviation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count == 0 || self.sample_count > MAX_SAMPLES {
            return Err(ConfigError::InvalidSampleCount(self.sample_count));
        }
        self.discount_rate.validate("discount_rate")?;
        self.growth_rate.validate("growth_rate")?;
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// All four fields are required; validation happens in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    cash_flows: Option<CashFlowSeries>,
    discount_rate: Option<DistributionSpec>,
    growth_rate: Option<DistributionSpec>,
    sample_count: Option<usize>,
}

impl SimulationConfigBuilder {
    /// Sets the forecast cash flows.
    #[inline]
    pub fn cash_flows(mut self, cash_flows: CashFlowSeries) -> Self {
        self.cash_flows = Some(cash_flows);
        self
    }

    /// Sets the discount rate distribution.
    #[inline]
    pub fn discount_rate(mut self, dist: DistributionSpec) -> Self {
        self.discount_rate = Some(dist);
        self
    }

    /// Sets the terminal growth rate distribution.
    #[inline]
    pub fn growth_rate(mut self, dist: DistributionSpec) -> Self {
        self.growth_rate = Some(dist);
        self
    }

    /// Sets the number of draws, in [1, 10_000_000].
    #[inline]
    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = Some(sample_count);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a field is missing or
    /// [`SimulationConfig::validate`] fails.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            cash_flows: self
                .cash_flows
                .ok_or(ConfigError::MissingParameter("cash_flows"))?,
            discount_rate: self
                .discount_rate
                .ok_or(ConfigError::MissingParameter("discount_rate"))?,
            growth_rate: self
                .growth_rate
                .ok_or(ConfigError::MissingParameter("growth_rate"))?,
            sample_count: self
                .sample_count
                .ok_or(ConfigError::MissingParameter("sample_count"))?,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flows() -> CashFlowSeries {
        CashFlowSeries::new(vec![100.0, 105.0]).unwrap()
    }

    fn valid_builder() -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .cash_flows(flows())
            .discount_rate(DistributionSpec::new(0.10, 0.01))
            .growth_rate(DistributionSpec::new(0.03, 0.01))
            .sample_count(1000)
    }

    #[test]
    fn test_config_builder_valid() {
        let config = valid_builder().build().unwrap();
        assert_eq!(config.sample_count(), 1000);
        assert_eq!(config.discount_rate(), DistributionSpec::new(0.10, 0.01));
        assert_eq!(config.growth_rate().mean, 0.03);
        assert_eq!(config.cash_flows(), &flows());
    }

    #[test]
    fn test_config_invalid_zero_samples() {
        let result = valid_builder().sample_count(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_samples() {
        let result = valid_builder().sample_count(MAX_SAMPLES + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(_))));
    }

    #[test]
    fn test_config_negative_std_dev() {
        let result = valid_builder()
            .growth_rate(DistributionSpec::new(0.03, -0.01))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDistribution {
                name: "growth_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_config_non_finite_mean() {
        let result = valid_builder()
            .discount_rate(DistributionSpec::new(f64::NAN, 0.01))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDistribution {
                name: "discount_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_config_zero_std_dev_allowed() {
        let config = valid_builder()
            .discount_rate(DistributionSpec::fixed(0.10))
            .build()
            .unwrap();
        assert!(config.discount_rate().is_degenerate());
    }

    #[test]
    fn test_config_missing_fields() {
        let result = SimulationConfig::builder().sample_count(10).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("cash_flows")));

        let result = SimulationConfig::builder()
            .cash_flows(flows())
            .discount_rate(DistributionSpec::fixed(0.1))
            .growth_rate(DistributionSpec::fixed(0.02))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("sample_count")));
    }
}

//! CLI configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and
//! command-line arguments. Rates are held as percentages here and converted to
//! fractions only when a valuation request is assembled.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use valuation_mc::mc::MAX_SAMPLES;

/// Configuration file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "dcf.toml";

/// Five-year free cash flow forecast used when none is configured.
pub const DEFAULT_CASH_FLOWS: [f64; 5] = [
    3_095_448_259.105_357_6,
    3_324_705_039.832_890_5,
    3_570_941_161.550_842_3,
    3_835_414_157.491_401_7,
    4_119_474_697.000_277_5,
];

const ENV_LOG_LEVEL: &str = "DCF_LOG_LEVEL";
const ENV_SEED: &str = "DCF_SEED";
const ENV_SAMPLES: &str = "DCF_SAMPLES";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid percentage for {name}: {value}. Must be between 0 and 100")]
    InvalidPercentage { name: &'static str, value: f64 },

    #[error("Invalid sample count: {0}. Must be between 1 and 10000000")]
    InvalidSampleCount(usize),

    #[error("Invalid histogram bin count: {0}. Must be at least 1")]
    InvalidBinCount(usize),

    #[error("Invalid cash flows: {0}")]
    InvalidCashFlows(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Deterministic single-point estimate settings (percentages).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointSettings {
    /// Discount rate (WACC) in percent.
    pub wacc: f64,
    /// Terminal growth rate in percent.
    pub growth: f64,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            wacc: 11.54,
            growth: 3.0,
        }
    }
}

/// Monte Carlo settings (percentages).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Mean discount rate in percent.
    pub wacc_mean: f64,
    /// Discount rate standard deviation in percent.
    pub wacc_std: f64,
    /// Mean terminal growth rate in percent.
    pub growth_mean: f64,
    /// Terminal growth standard deviation in percent.
    pub growth_std: f64,
    /// Number of draws.
    pub samples: usize,
    /// Seed for reproducible runs; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Whether to run across the rayon thread pool.
    pub parallel: bool,
    /// Histogram bin count.
    pub bins: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            wacc_mean: 11.53,
            wacc_std: 1.154,
            growth_mean: 3.5,
            growth_std: 1.443,
            samples: 1000,
            seed: None,
            parallel: false,
            bins: 50,
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Forecast cash flows, period 1 first.
    pub cash_flows: Vec<f64>,
    /// Single-point estimate settings.
    pub point: PointSettings,
    /// Simulation settings.
    pub simulation: SimulationSettings,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            cash_flows: DEFAULT_CASH_FLOWS.to_vec(),
            point: PointSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `DCF_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={} is not a u64", ENV_SEED, seed)))?;
            self.simulation.seed = Some(seed);
        }

        if let Some(samples) = lookup(ENV_SAMPLES) {
            self.simulation.samples = samples.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not a count", ENV_SAMPLES, samples))
            })?;
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        } else if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(cash_flows) = &cli.cash_flows {
            self.cash_flows = parse_cash_flows(cash_flows)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cash_flows.is_empty() {
            return Err(ConfigError::InvalidCashFlows(
                "at least one cash flow is required".to_string(),
            ));
        }
        if let Some(value) = self.cash_flows.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidCashFlows(format!(
                "{} is not a finite amount",
                value
            )));
        }

        self.point.validate()?;
        self.simulation.validate()
    }
}

impl PointSettings {
    /// Apply command-line overrides
    pub fn merge(&mut self, wacc: Option<f64>, growth: Option<f64>) {
        if let Some(wacc) = wacc {
            self.wacc = wacc;
        }
        if let Some(growth) = growth {
            self.growth = growth;
        }
    }

    /// Validate both rates
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percentage("wacc", self.wacc)?;
        check_percentage("growth", self.growth)
    }
}

/// Command-line overrides for [`SimulationSettings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationOverrides {
    pub wacc_mean: Option<f64>,
    pub wacc_std: Option<f64>,
    pub growth_mean: Option<f64>,
    pub growth_std: Option<f64>,
    pub samples: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub bins: Option<usize>,
}

impl SimulationSettings {
    /// Apply command-line overrides
    pub fn merge(&mut self, overrides: &SimulationOverrides) {
        if let Some(v) = overrides.wacc_mean {
            self.wacc_mean = v;
        }
        if let Some(v) = overrides.wacc_std {
            self.wacc_std = v;
        }
        if let Some(v) = overrides.growth_mean {
            self.growth_mean = v;
        }
        if let Some(v) = overrides.growth_std {
            self.growth_std = v;
        }
        if let Some(v) = overrides.samples {
            self.samples = v;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.parallel {
            self.parallel = true;
        }
        if let Some(v) = overrides.bins {
            self.bins = v;
        }
    }

    /// Validate rates, sample count and bin count
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percentage("wacc_mean", self.wacc_mean)?;
        check_percentage("wacc_std", self.wacc_std)?;
        check_percentage("growth_mean", self.growth_mean)?;
        check_percentage("growth_std", self.growth_std)?;

        if self.samples == 0 || self.samples > MAX_SAMPLES {
            return Err(ConfigError::InvalidSampleCount(self.samples));
        }
        if self.bins == 0 {
            return Err(ConfigError::InvalidBinCount(self.bins));
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Raise the log level to debug unless one is given explicitly
    pub verbose: bool,
    /// Comma-separated cash flow override
    pub cash_flows: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let default_file = Path::new(DEFAULT_CONFIG_FILE);
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None if default_file.is_file() => CliConfig::from_file(default_file)?,
        None => CliConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

/// Converts a user-facing percentage to a fractional rate.
#[inline]
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Parses a comma-separated list of cash flow amounts.
pub fn parse_cash_flows(input: &str) -> Result<Vec<f64>, ConfigError> {
    let amounts = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| ConfigError::InvalidCashFlows(format!("'{}' is not a number", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if amounts.is_empty() {
        return Err(ConfigError::InvalidCashFlows(
            "at least one cash flow is required".to_string(),
        ));
    }
    Ok(amounts)
}

fn check_percentage(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::InvalidPercentage { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.cash_flows.len(), 5);
        assert_eq!(config.point.wacc, 11.54);
        assert_eq!(config.point.growth, 3.0);
        assert_eq!(config.simulation.wacc_mean, 11.53);
        assert_eq!(config.simulation.wacc_std, 1.154);
        assert_eq!(config.simulation.growth_mean, 3.5);
        assert_eq!(config.simulation.growth_std, 1.443);
        assert_eq!(config.simulation.samples, 1000);
        assert_eq!(config.simulation.seed, None);
        assert!(!config.simulation.parallel);
        assert_eq!(config.simulation.bins, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CliConfig::from_toml_str(
            r#"
            log_level = "warn"
            cash_flows = [100.0, 110.0, 121.0]

            [simulation]
            samples = 5000
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.cash_flows, vec![100.0, 110.0, 121.0]);
        assert_eq!(config.simulation.samples, 5000);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.wacc_mean, 11.53);
        assert_eq!(config.point, PointSettings::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            CliConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::FileError(_))
        ));
        assert!(matches!(
            CliConfig::from_toml_str("cash_flows = []"),
            Err(ConfigError::InvalidCashFlows(_))
        ));
        assert!(matches!(
            CliConfig::from_toml_str("[point]\nwacc = 150.0"),
            Err(ConfigError::InvalidPercentage { name: "wacc", .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env_from(env(&[
                ("DCF_LOG_LEVEL", "debug"),
                ("DCF_SEED", "42"),
                ("DCF_SAMPLES", "20000"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.samples, 20_000);
    }

    #[test]
    fn test_env_invalid_values() {
        let mut config = CliConfig::default();
        assert!(matches!(
            config.apply_env_from(env(&[("DCF_SEED", "abc")])),
            Err(ConfigError::EnvError(_))
        ));
        assert!(matches!(
            config.apply_env_from(env(&[("DCF_SAMPLES", "-1")])),
            Err(ConfigError::EnvError(_))
        ));
        assert!(matches!(
            config.apply_env_from(env(&[("DCF_LOG_LEVEL", "chatty")])),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let mut config = CliConfig::default();
        config
            .apply_env_from(env(&[("DCF_LOG_LEVEL", "warn")]))
            .unwrap();

        let cli = CliArgs {
            log_level: Some("trace".to_string()),
            cash_flows: Some("1, 2,3".to_string()),
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.cash_flows, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_verbose_raises_level() {
        let mut config = CliConfig::default();
        let cli = CliArgs {
            verbose: true,
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_simulation_overrides() {
        let mut settings = SimulationSettings::default();
        settings.merge(&SimulationOverrides {
            wacc_mean: Some(10.0),
            samples: Some(250),
            seed: Some(9),
            parallel: true,
            ..Default::default()
        });

        assert_eq!(settings.wacc_mean, 10.0);
        assert_eq!(settings.wacc_std, 1.154);
        assert_eq!(settings.samples, 250);
        assert_eq!(settings.seed, Some(9));
        assert!(settings.parallel);
    }

    #[test]
    fn test_sample_count_bounds() {
        let mut settings = SimulationSettings::default();
        settings.samples = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidSampleCount(0))
        ));
        settings.samples = MAX_SAMPLES + 1;
        assert!(settings.validate().is_err());
        settings.samples = MAX_SAMPLES;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_percentage_bounds() {
        let mut point = PointSettings::default();
        point.merge(Some(-1.0), None);
        assert!(matches!(
            point.validate(),
            Err(ConfigError::InvalidPercentage { name: "wacc", .. })
        ));
        point.merge(Some(100.0), Some(f64::NAN));
        assert!(matches!(
            point.validate(),
            Err(ConfigError::InvalidPercentage { name: "growth", .. })
        ));
    }

    #[test]
    fn test_parse_cash_flows() {
        assert_eq!(
            parse_cash_flows("100, 105.5,-3e2").unwrap(),
            vec![100.0, 105.5, -300.0]
        );
        assert!(parse_cash_flows("").is_err());
        assert!(parse_cash_flows(" , ").is_err());
        assert!(parse_cash_flows("100,abc").is_err());
    }

    #[test]
    fn test_percent_to_fraction() {
        assert_relative_eq!(percent_to_fraction(11.54), 0.1154, epsilon = 1e-15);
        assert_eq!(percent_to_fraction(0.0), 0.0);
    }
}

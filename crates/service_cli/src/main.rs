//! dcf-valuation - Command Line DCF Valuation
//!
//! # Commands
//!
//! - `dcf-valuation point` - Single-point DCF estimate at one WACC and growth rate
//! - `dcf-valuation simulate` - Monte Carlo distribution of intrinsic values
//!
//! Rates are entered as percentages. Configuration is resolved from CLI flags,
//! `DCF_*` environment variables, a TOML file and built-in defaults, in that
//! order of precedence.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use service_cli::commands::{self, OutputFormat};
use service_cli::config::{build_config, CliArgs, SimulationOverrides};
use service_cli::CliError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when every simulated draw was rejected.
const EXIT_INSUFFICIENT_SAMPLES: u8 = 2;

/// DCF valuation with Monte Carlo uncertainty
#[derive(Parser)]
#[command(name = "dcf-valuation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Comma-separated forecast cash flows, period 1 first
    #[arg(long, global = true, value_name = "LIST", allow_hyphen_values = true)]
    cash_flows: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value the forecast at a single WACC and terminal growth rate
    Point {
        /// Discount rate (WACC) in percent
        #[arg(long)]
        wacc: Option<f64>,

        /// Terminal growth rate in percent
        #[arg(long)]
        growth: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Simulate the distribution of intrinsic values
    Simulate {
        /// Mean WACC in percent
        #[arg(long)]
        wacc_mean: Option<f64>,

        /// WACC standard deviation in percent
        #[arg(long)]
        wacc_std: Option<f64>,

        /// Mean terminal growth rate in percent
        #[arg(long)]
        growth_mean: Option<f64>,

        /// Terminal growth standard deviation in percent
        #[arg(long)]
        growth_std: Option<f64>,

        /// Number of draws (1 to 10,000,000)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Sample across all cores
        #[arg(short, long)]
        parallel: bool,

        /// Histogram bin count
        #[arg(long)]
        bins: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let args = CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        verbose: cli.verbose,
        cash_flows: cli.cash_flows,
    };
    let mut config = build_config(&args).context("Failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());
    tracing::debug!("dcf-valuation v{}", service_cli::VERSION);

    match cli.command {
        Commands::Point {
            wacc,
            growth,
            format,
        } => {
            config.point.merge(wacc, growth);
            config.point.validate().map_err(CliError::from)?;
            commands::point::run(&config, format)?;
        }
        Commands::Simulate {
            wacc_mean,
            wacc_std,
            growth_mean,
            growth_std,
            samples,
            seed,
            parallel,
            bins,
            format,
        } => {
            config.simulation.merge(&SimulationOverrides {
                wacc_mean,
                wacc_std,
                growth_mean,
                growth_std,
                samples,
                seed,
                parallel,
                bins,
            });
            config.simulation.validate().map_err(CliError::from)?;
            commands::simulate::run(&config, format)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let insufficient = err
                .downcast_ref::<CliError>()
                .is_some_and(CliError::is_insufficient_samples);

            eprintln!("Error: {:#}", err);
            if insufficient {
                ExitCode::from(EXIT_INSUFFICIENT_SAMPLES)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

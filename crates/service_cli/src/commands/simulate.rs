//! Simulate command implementation
//!
//! Runs the Monte Carlo valuation over normally distributed discount and
//! growth rates and reports the distribution of intrinsic values.

use serde::Serialize;
use tracing::info;
use valuation_core::math::statistics::{Histogram, SummaryStatistics};
use valuation_core::types::CashFlowSeries;
use valuation_mc::mc::{DistributionSpec, MonteCarloSimulator, SimulationConfig, SimulationError};
use valuation_mc::rng::ValuationRng;

use super::OutputFormat;
use crate::config::{percent_to_fraction, CliConfig, SimulationSettings};
use crate::Result;

/// Summary of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Seed the run was drawn from.
    pub seed: u64,
    /// Whether the chunked parallel sampler was used.
    pub parallel: bool,
    /// Input parameters, percentages as entered.
    pub parameters: SimulationSettings,
    /// Number of draws that produced a valuation.
    pub accepted: usize,
    /// Number of draws discarded because `wacc <= growth`.
    pub rejected: usize,
    /// Statistics of the accepted intrinsic values.
    pub statistics: SummaryStatistics,
    /// Frequency distribution of the accepted intrinsic values.
    pub histogram: Histogram,
}

/// Translates percentage settings into a validated simulation configuration.
pub fn build_simulation_config(
    cash_flows: CashFlowSeries,
    settings: &SimulationSettings,
) -> Result<SimulationConfig> {
    let config = SimulationConfig::builder()
        .cash_flows(cash_flows)
        .discount_rate(DistributionSpec::new(
            percent_to_fraction(settings.wacc_mean),
            percent_to_fraction(settings.wacc_std),
        ))
        .growth_rate(DistributionSpec::new(
            percent_to_fraction(settings.growth_mean),
            percent_to_fraction(settings.growth_std),
        ))
        .sample_count(settings.samples)
        .build()?;
    Ok(config)
}

/// Runs the simulation described by `settings`.
///
/// # Errors
///
/// Returns [`crate::CliError::Simulation`] wrapping `EmptySimulation` when
/// every draw was rejected.
pub fn build_report(
    cash_flows: CashFlowSeries,
    settings: &SimulationSettings,
) -> Result<SimulationReport> {
    let config = build_simulation_config(cash_flows, settings)?;
    let simulator = MonteCarloSimulator::new(config)?;

    let mut rng = match settings.seed {
        Some(seed) => ValuationRng::from_seed(seed),
        None => ValuationRng::from_entropy(),
    };
    let seed = rng.seed();

    let outcome = if settings.parallel {
        simulator.run_parallel(seed)?
    } else {
        simulator.run(&mut rng)?
    };

    Ok(SimulationReport {
        seed,
        parallel: settings.parallel,
        parameters: *settings,
        accepted: outcome.accepted_count(),
        rejected: outcome.rejected_count(),
        statistics: *outcome.summary(),
        histogram: outcome.histogram(settings.bins).map_err(SimulationError::from)?,
    })
}

/// Renders the report as a plain-text summary with a bar histogram.
pub fn render_table(report: &SimulationReport) -> String {
    let p = &report.parameters;
    let s = &report.statistics;

    let mut out = String::new();
    out.push_str("Monte Carlo DCF valuation\n\n");
    out.push_str(&format!(
        "WACC            N({:.4}%, {:.4}%)\n",
        p.wacc_mean, p.wacc_std
    ));
    out.push_str(&format!(
        "Terminal growth N({:.4}%, {:.4}%)\n",
        p.growth_mean, p.growth_std
    ));
    out.push_str(&format!(
        "Samples         {} ({} accepted, {} rejected)\n",
        p.samples, report.accepted, report.rejected
    ));
    out.push_str(&format!(
        "Seed            {}{}\n\n",
        report.seed,
        if report.parallel { " (parallel)" } else { "" }
    ));

    for (label, value) in [
        ("Mean", s.mean),
        ("5th percentile", s.p5),
        ("Median", s.median),
        ("95th percentile", s.p95),
        ("Std deviation", s.std_dev),
        ("Min", s.min),
        ("Max", s.max),
    ] {
        out.push_str(&format!("{:<18}{:>24.2}\n", label, value));
    }

    out.push('\n');
    out.push_str(&render_histogram(&report.histogram, 40));
    out
}

fn render_histogram(histogram: &Histogram, width: usize) -> String {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);

    histogram
        .iter()
        .map(|(lo, hi, count)| {
            let bar = "#".repeat(count * width / peak);
            format!("{:>20.2} .. {:>20.2} | {:>7} {}\n", lo, hi, count, bar)
        })
        .collect()
}

/// Run the simulate command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let cash_flows = CashFlowSeries::new(config.cash_flows.clone())?;
    let settings = &config.simulation;
    info!(
        samples = settings.samples,
        parallel = settings.parallel,
        seed = ?settings.seed,
        "Starting simulation"
    );

    let report = build_report(cash_flows, settings)?;
    match format {
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    info!(
        seed = report.seed,
        accepted = report.accepted,
        rejected = report.rejected,
        "Simulation report written"
    );
    Ok(())
}

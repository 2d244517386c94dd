//! Point command implementation
//!
//! Values the forecast at a single discount rate and growth rate.

use serde::Serialize;
use tracing::info;
use valuation_core::dcf::{intrinsic_value, point_estimate, present_values, PointEstimate};
use valuation_core::types::CashFlowSeries;

use super::OutputFormat;
use crate::config::{percent_to_fraction, CliConfig, PointSettings};
use crate::Result;

/// Deterministic valuation at one rate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    /// Discount rate in percent.
    pub wacc_percent: f64,
    /// Terminal growth rate in percent.
    pub growth_percent: f64,
    /// `(period, cash flow, present value)` per explicit period.
    pub periods: Vec<PeriodValue>,
    /// Discounted sum, terminal value and intrinsic value.
    pub estimate: PointEstimate,
    /// Intrinsic value with the terminal value also discounted, as used by
    /// the simulation.
    pub discounted_terminal_value_total: f64,
}

/// One explicit forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodValue {
    pub period: usize,
    pub cash_flow: f64,
    pub present_value: f64,
}

/// Computes the report for `cash_flows` at `settings`.
pub fn build_report(cash_flows: &CashFlowSeries, settings: &PointSettings) -> Result<PointReport> {
    let discount_rate = percent_to_fraction(settings.wacc);
    let growth_rate = percent_to_fraction(settings.growth);

    let estimate = point_estimate(cash_flows, discount_rate, growth_rate)?;
    let periods = cash_flows
        .periods()
        .zip(present_values(cash_flows, discount_rate)?)
        .map(|((period, cash_flow), present_value)| PeriodValue {
            period,
            cash_flow,
            present_value,
        })
        .collect();

    Ok(PointReport {
        wacc_percent: settings.wacc,
        growth_percent: settings.growth,
        periods,
        estimate,
        discounted_terminal_value_total: intrinsic_value(cash_flows, discount_rate, growth_rate)?,
    })
}

/// Renders the report as a plain-text table.
pub fn render_table(report: &PointReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "DCF point estimate (WACC {:.2}%, terminal growth {:.2}%)\n\n",
        report.wacc_percent, report.growth_percent
    ));
    out.push_str(&format!(
        "{:>6}  {:>22}  {:>22}\n",
        "Period", "Cash flow", "Present value"
    ));
    for p in &report.periods {
        out.push_str(&format!(
            "{:>6}  {:>22.2}  {:>22.2}\n",
            p.period, p.cash_flow, p.present_value
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:<34}{:>22.2}\n",
        "Discounted cash flow sum", report.estimate.discounted_sum
    ));
    out.push_str(&format!(
        "{:<34}{:>22.2}\n",
        "Terminal value", report.estimate.terminal_value
    ));
    out.push_str(&format!(
        "{:<34}{:>22.2}\n",
        "Intrinsic value", report.estimate.intrinsic_value
    ));
    out.push_str(&format!(
        "{:<34}{:>22.2}\n",
        "Intrinsic value (discounted TV)", report.discounted_terminal_value_total
    ));
    out
}

/// Run the point command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let cash_flows = CashFlowSeries::new(config.cash_flows.clone())?;
    info!(
        periods = cash_flows.len(),
        wacc = config.point.wacc,
        growth = config.point.growth,
        "Computing point estimate"
    );

    let report = build_report(&cash_flows, &config.point)?;
    match format {
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    info!(
        intrinsic_value = report.estimate.intrinsic_value,
        "Point estimate complete"
    );
    Ok(())
}

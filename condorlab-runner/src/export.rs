//! Artifact export — CSV ledgers plus a JSON summary.
//!
//! A finished run writes four files into the output directory:
//! - `trades.csv` — the full trade tape
//! - `equity.csv` — per-bar running balance
//! - `rejections.csv` — rejected entry evaluations with indicator snapshots
//! - `summary.json` — run id, config, and summary metrics

use std::path::Path;

use anyhow::{Context, Result};
use condorlab_core::domain::{EquityPoint, RejectedEvaluation, Trade};
use condorlab_core::engine::BacktestResult;
use serde::Serialize;

use crate::config::RunConfig;
use crate::metrics::{monthly_breakdown, pnl_distribution, MonthlyRow, PnlDistribution, SummaryMetrics};

/// The `summary.json` payload.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub run_id: String,
    pub config: &'a RunConfig,
    pub metrics: SummaryMetrics,
    pub monthly: Vec<MonthlyRow>,
    pub pnl_distribution: PnlDistribution,
}

/// Render the trade tape as CSV.
pub fn trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_index",
        "entry_timestamp",
        "exit_index",
        "exit_timestamp",
        "short_put",
        "long_put",
        "short_call",
        "long_call",
        "credit",
        "bias",
        "exit_reason",
        "settle_price",
        "pnl",
        "bars_held",
        "days_held",
        "pnl_pct_of_max_risk",
    ])?;
    for t in trades {
        wtr.write_record([
            t.entry_index.to_string(),
            t.entry_timestamp.to_string(),
            t.exit_index.to_string(),
            t.exit_timestamp.to_string(),
            t.strikes.short_put.to_string(),
            t.strikes.long_put.to_string(),
            t.strikes.short_call.to_string(),
            t.strikes.long_call.to_string(),
            t.credit.to_string(),
            t.bias.as_str().to_string(),
            t.exit_reason.as_str().to_string(),
            t.settle_price.to_string(),
            t.pnl.to_string(),
            t.bars_held.to_string(),
            t.days_held.to_string(),
            t.pnl_pct_of_max_risk.to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().context("failed to flush trades CSV")?;
    String::from_utf8(bytes).context("trades CSV was not valid UTF-8")
}

/// Render the equity curve as CSV.
pub fn equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "equity"])?;
    for point in equity_curve {
        wtr.write_record([point.timestamp.to_string(), point.equity.to_string()])?;
    }
    let bytes = wtr.into_inner().context("failed to flush equity CSV")?;
    String::from_utf8(bytes).context("equity CSV was not valid UTF-8")
}

/// Render the rejection ledger as CSV.
pub fn rejections_csv(rejections: &[RejectedEvaluation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "timestamp", "reason", "adx", "rsi", "hv"])?;
    for r in rejections {
        wtr.write_record([
            r.bar_index.to_string(),
            r.timestamp.to_string(),
            r.reason.as_str().to_string(),
            r.adx.to_string(),
            r.rsi.to_string(),
            r.hv.to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().context("failed to flush rejections CSV")?;
    String::from_utf8(bytes).context("rejections CSV was not valid UTF-8")
}

/// Write all artifacts for a finished run into `out_dir`.
///
/// Creates the directory if needed. Returns the run id the artifacts are
/// labeled with.
pub fn export_run(run_config: &RunConfig, result: &BacktestResult, out_dir: &Path) -> Result<String> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let run_id = run_config.run_id();
    let summary = RunSummary {
        run_id: run_id.clone(),
        config: run_config,
        metrics: SummaryMetrics::compute(result),
        monthly: monthly_breakdown(&result.trades),
        pnl_distribution: pnl_distribution(&result.trades, 20),
    };

    let write = |name: &str, content: String| -> Result<()> {
        let path = out_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))
    };

    write("trades.csv", trades_csv(&result.trades)?)?;
    write("equity.csv", equity_csv(&result.equity_curve)?)?;
    write("rejections.csv", rejections_csv(&result.rejections)?)?;
    write(
        "summary.json",
        serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?,
    )?;
    Ok(run_id)
}

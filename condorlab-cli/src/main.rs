//! CondorLab CLI — run a condor backtest from files on disk.
//!
//! Commands:
//! - `run` — load CSV bars, a TOML run config, and an optional blackout date
//!   list; run the backtest; print a summary and export artifacts

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use condorlab_core::calendar::BlackoutCalendar;
use condorlab_core::engine::{run_backtest, BacktestResult, Progress};
use condorlab_runner::{
    export_run, load_bars_csv, load_blackout_dates, monthly_breakdown, RunConfig, SummaryMetrics,
};

#[derive(Parser)]
#[command(
    name = "condorlab",
    about = "CondorLab CLI — iron condor backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest from CSV bars and a TOML config.
    Run {
        /// Bar CSV (timestamp,open,high,low,close,vwap,volume).
        #[arg(long)]
        data: PathBuf,

        /// TOML run config. Defaults apply to anything unset.
        #[arg(long)]
        config: PathBuf,

        /// Blackout date list, one YYYY-MM-DD per line. Merged with any
        /// dates in the config.
        #[arg(long)]
        blackouts: Option<PathBuf>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        out: PathBuf,

        /// Suppress the progress line.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            blackouts,
            out,
            quiet,
        } => run_cmd(data, config, blackouts, out, quiet),
    }
}

fn run_cmd(
    data: PathBuf,
    config_path: PathBuf,
    blackouts: Option<PathBuf>,
    out: PathBuf,
    quiet: bool,
) -> Result<()> {
    let mut run_config = RunConfig::from_toml_file(&config_path)?;
    let series = load_bars_csv(&data)
        .with_context(|| format!("failed to load bars from {}", data.display()))?;

    if let Some(path) = blackouts {
        let dates = load_blackout_dates(&path)
            .with_context(|| format!("failed to load blackout dates from {}", path.display()))?;
        run_config.blackout_dates.extend(dates);
    }
    let calendar = BlackoutCalendar::new(run_config.blackout_dates.clone());

    let mut print_progress = |p: Progress| {
        if !quiet {
            eprint!("\rbar {}/{} ({:.0}%)", p.current, p.total, p.percent());
            if p.current + 1 == p.total {
                eprintln!();
            }
        }
    };
    let result = run_backtest(
        &series,
        &calendar,
        &run_config.backtest,
        Some(&mut print_progress),
    )?;

    print_summary(&run_config, &result);

    let run_id = export_run(&run_config, &result, &out)?;
    println!("Artifacts saved to: {} (run {})", out.display(), run_id);

    Ok(())
}

fn print_summary(run_config: &RunConfig, result: &BacktestResult) {
    let m = SummaryMetrics::compute(result);

    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:          {}", run_config.symbol);
    println!("Bars:            {}", result.equity_curve.len());
    println!("Trades:          {}", m.total_trades);
    println!(
        "Exits:           broke {} / breach {} / trend {} / reference {} / expiry {}",
        m.exits.broke, m.exits.breach, m.exits.trend_exit, m.exits.reference_exit, m.exits.expiry
    );
    println!();
    println!("--- Performance ---");
    println!("Win Rate:        {:.1}%", m.win_rate_pct);
    println!("Total P&L:       ${:.2}", m.total_pnl);
    println!("Avg P&L:         ${:.2}", m.avg_pnl);
    println!("Best / Worst:    ${:.2} / ${:.2}", m.best_pnl, m.worst_pnl);
    if m.profit_factor.is_finite() {
        println!("Profit Factor:   {:.2}", m.profit_factor);
    } else {
        println!("Profit Factor:   inf (no losing trades)");
    }
    println!("Max Drawdown:    ${:.2} ({:.2}%)", m.max_drawdown, m.max_drawdown_pct);
    println!(
        "Streaks:         {} wins / {} losses",
        m.longest_win_streak, m.longest_loss_streak
    );
    println!("Return on Risk:  {:.2}%", m.return_on_risk_pct);
    println!("Final Equity:    ${:.2}", m.final_equity);

    let monthly = monthly_breakdown(&result.trades);
    if !monthly.is_empty() {
        println!();
        println!("--- Monthly ---");
        for row in &monthly {
            println!(
                "{}  {:>3} trades  {:>10.2}  {:>5.1}% wins",
                row.month, row.trades, row.pnl, row.win_rate_pct
            );
        }
    }
    println!();
}

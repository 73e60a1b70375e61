//! CondorLab Runner — run orchestration on top of `condorlab-core`.
//!
//! This crate builds on the simulation engine to provide:
//! - Serializable run configuration with a content-addressed run id
//! - CSV bar and blackout-date loading
//! - Summary metrics, monthly breakdown, and P&L distribution
//! - Artifact export (trade tape, equity curve, rejection ledger, summary)
//! - Parallel multi-config sweeps

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod sweep;

pub use config::{RunConfig, RunId};
pub use data_loader::{load_bars_csv, load_blackout_dates, LoadError};
pub use export::export_run;
pub use metrics::{
    monthly_breakdown, pnl_distribution, MonthlyRow, PnlDistribution, SummaryMetrics,
};
pub use sweep::{run_sweep, SweepOutcome};

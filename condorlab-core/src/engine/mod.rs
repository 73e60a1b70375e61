//! Simulation engine — entry construction, exit state machine, and the
//! bar-by-bar orchestrator.
//!
//! One pass, single-threaded, no I/O inside the loop. Per bar:
//! Flat → eligibility filter (admit opens a position, reject is ledgered);
//! Open → five exit rules in strict priority order (first match closes).
//! Every bar appends one equity point; equity is realized P&L only.

pub mod entry;
pub mod exit;
pub mod loop_runner;
pub mod state;

pub use entry::{open_position, plan_expiry, round_strike};
pub use exit::{evaluate_exit, ExitDecision};
pub use loop_runner::{run_backtest, Progress};
pub use state::{BacktestError, BacktestResult};

//! Parallel multi-config execution.
//!
//! Each run owns its ledgers; the price series and calendar are shared
//! read-only across the pool. Results come back in input order regardless
//! of completion order.

use condorlab_core::calendar::BlackoutCalendar;
use condorlab_core::config::BacktestConfig;
use condorlab_core::domain::PriceSeries;
use condorlab_core::engine::{run_backtest, BacktestError, BacktestResult};
use rayon::prelude::*;

use crate::metrics::SummaryMetrics;

/// One sweep slot: the config that ran and what it produced. A failed run
/// (bad config, insufficient history) is recorded, not fatal to the sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    pub config: BacktestConfig,
    pub outcome: Result<(BacktestResult, SummaryMetrics), BacktestError>,
}

/// Run every config against the same series and calendar, in parallel.
pub fn run_sweep(
    series: &PriceSeries,
    calendar: &BlackoutCalendar,
    configs: Vec<BacktestConfig>,
) -> Vec<SweepOutcome> {
    configs
        .into_par_iter()
        .map(|config| {
            let outcome = run_backtest(series, calendar, &config, None).map(|result| {
                let metrics = SummaryMetrics::compute(&result);
                (result, metrics)
            });
            SweepOutcome { config, outcome }
        })
        .collect()
}

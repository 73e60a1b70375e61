//! Bar-by-bar orchestrator — the heart of the simulation.
//!
//! Validates config and preconditions, precomputes the indicator frame and
//! blackout mask, then scans bars in ascending order mutating only the
//! position state, the ledgers, and the running equity.

use crate::calendar::BlackoutCalendar;
use crate::config::BacktestConfig;
use crate::domain::{
    EquityPoint, PositionState, PreconditionError, PriceSeries, RejectedEvaluation, Trade,
};
use crate::engine::entry::open_position;
use crate::engine::exit::evaluate_exit;
use crate::engine::state::{BacktestError, BacktestResult};
use crate::filter::{evaluate_entry, Eligibility};
use crate::indicators::IndicatorFrame;
use crate::payoff::{condor_pnl, max_risk};

/// Progress notification: current bar index (0-based) and total bar count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Completion as a percentage of the bar count.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * (self.current + 1) as f64 / self.total as f64
        }
    }
}

/// Batched progress cadence: one notification per 5% of bars.
const PROGRESS_FRACTION: usize = 20;

/// Run a complete backtest over a validated price series.
///
/// Fails fast (before the loop) on an invalid configuration or a series
/// shorter than the largest indicator window. The optional `progress`
/// callback fires roughly every 5% of bars and always on the final bar.
pub fn run_backtest(
    series: &PriceSeries,
    calendar: &BlackoutCalendar,
    config: &BacktestConfig,
    mut progress: Option<&mut dyn FnMut(Progress)>,
) -> Result<BacktestResult, BacktestError> {
    config.validate()?;

    let bars = series.bars();
    let n = bars.len();
    let required = config.warmup_bars();
    if n < required {
        return Err(BacktestError::Precondition(
            PreconditionError::InsufficientHistory {
                required,
                available: n,
            },
        ));
    }

    // Everything the loop reads is computed up front and held read-only.
    let frame = IndicatorFrame::compute(bars, config);
    let blackout = calendar.mask(bars, config.blackout_days_before, config.blackout_days_after);

    let mut state = PositionState::Flat;
    let mut trades: Vec<Trade> = Vec::new();
    let mut rejections: Vec<RejectedEvaluation> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(n);
    let mut equity = config.initial_capital;

    let update_every = (n / PROGRESS_FRACTION).max(1);

    for i in 0..n {
        state = match state {
            PositionState::Open(position) => {
                if let Some(decision) = evaluate_exit(&position, i, bars, &frame, config) {
                    let pnl = condor_pnl(
                        &position.strikes,
                        position.credit,
                        decision.settle_price,
                        config.contract_multiplier,
                        config.per_leg_fee,
                    );
                    let risk = max_risk(
                        &position.strikes,
                        position.credit,
                        config.contract_multiplier,
                        config.per_leg_fee,
                    );
                    equity += pnl;
                    let entry_timestamp = bars[position.entry_index].timestamp;
                    trades.push(Trade::close(
                        position,
                        entry_timestamp,
                        i,
                        bars[i].timestamp,
                        decision.reason,
                        decision.settle_price,
                        pnl,
                        risk,
                    ));
                    PositionState::Flat
                } else {
                    PositionState::Open(position)
                }
            }
            PositionState::Flat => match evaluate_entry(i, &frame, &blackout, config) {
                Eligibility::Admit => PositionState::Open(open_position(i, bars, &frame, config)),
                Eligibility::Reject(reason) => {
                    rejections.push(RejectedEvaluation {
                        bar_index: i,
                        timestamp: bars[i].timestamp,
                        reason,
                        adx: frame.adx[i],
                        rsi: frame.rsi[i],
                        hv: frame.hv[i],
                    });
                    PositionState::Flat
                }
            },
        };

        equity_curve.push(EquityPoint {
            timestamp: bars[i].timestamp,
            equity,
        });

        if let Some(callback) = progress.as_deref_mut() {
            if i % update_every == 0 || i == n - 1 {
                callback(Progress {
                    current: i,
                    total: n,
                });
            }
        }
    }

    Ok(BacktestResult {
        config: config.clone(),
        indicators: frame,
        trades,
        equity_curve,
        rejections,
    })
}

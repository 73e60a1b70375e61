//! Summary metrics — pure functions over the trade ledger and equity curve.
//!
//! Degenerate inputs always produce sentinel values, never panics: an empty
//! ledger yields zero counts and a 0.0 profit factor; winners with no losers
//! yield `f64::INFINITY`.

use chrono::Datelike;
use condorlab_core::domain::{EquityPoint, Trade};
use condorlab_core::engine::BacktestResult;
use condorlab_core::payoff;
use serde::{Deserialize, Serialize};

/// Trade counts by exit cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCounts {
    pub broke: usize,
    pub breach: usize,
    pub trend_exit: usize,
    pub reference_exit: usize,
    pub expiry: usize,
}

/// Aggregate performance summary for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub exits: ExitCounts,
    /// Winning trades as a percent of all trades. 0.0 with no trades.
    pub win_rate_pct: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
    pub best_pnl: f64,
    pub worst_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Gross profit / gross loss. `INFINITY` with winners and no losers,
    /// 0.0 with no trades.
    pub profit_factor: f64,
    /// Average win / |average loss|, same sentinel convention.
    pub reward_risk_ratio: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
    /// Largest peak-to-trough equity drop, in dollars (>= 0).
    pub max_drawdown: f64,
    /// The same drop as a percent of the peak it fell from.
    pub max_drawdown_pct: f64,
    /// Sum of per-trade maximum dollar risk.
    pub total_risk: f64,
    pub avg_risk: f64,
    /// Total P&L as a percent of total risk deployed. 0.0 with no risk.
    pub return_on_risk_pct: f64,
    pub avg_bars_held: f64,
    pub final_equity: f64,
}

impl SummaryMetrics {
    /// Compute the full summary from a finished run.
    pub fn compute(result: &BacktestResult) -> Self {
        let trades = &result.trades;
        let mult = result.config.contract_multiplier;
        let fee = result.config.per_leg_fee;

        let wins = trades.iter().filter(|t| t.is_winner()).count();
        let losses = trades.len() - wins;

        let mut exits = ExitCounts::default();
        for trade in trades {
            use condorlab_core::domain::ExitReason::*;
            match trade.exit_reason {
                Broke => exits.broke += 1,
                Breach => exits.breach += 1,
                TrendExit => exits.trend_exit += 1,
                ReferenceExit => exits.reference_exit += 1,
                Expiry => exits.expiry += 1,
            }
        }

        let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
        let total_pnl: f64 = pnls.iter().sum();
        let risks: Vec<f64> = trades
            .iter()
            .map(|t| payoff::max_risk(&t.strikes, t.credit, mult, fee))
            .collect();
        let total_risk: f64 = risks.iter().sum();

        let (dd, dd_pct) = max_drawdown(&result.equity_curve);

        Self {
            total_trades: trades.len(),
            wins,
            losses,
            exits,
            win_rate_pct: if trades.is_empty() {
                0.0
            } else {
                100.0 * wins as f64 / trades.len() as f64
            },
            total_pnl,
            avg_pnl: mean(&pnls),
            best_pnl: if pnls.is_empty() {
                0.0
            } else {
                pnls.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            },
            worst_pnl: if pnls.is_empty() {
                0.0
            } else {
                pnls.iter().copied().fold(f64::INFINITY, f64::min)
            },
            avg_win: mean_filtered(&pnls, |p| p > 0.0),
            avg_loss: mean_filtered(&pnls, |p| p < 0.0),
            profit_factor: profit_factor(trades),
            reward_risk_ratio: reward_risk_ratio(trades),
            longest_win_streak: longest_streak(trades, true),
            longest_loss_streak: longest_streak(trades, false),
            max_drawdown: dd,
            max_drawdown_pct: dd_pct,
            total_risk,
            avg_risk: mean(&risks),
            return_on_risk_pct: if total_risk > 0.0 {
                100.0 * total_pnl / total_risk
            } else {
                0.0
            },
            avg_bars_held: mean(
                &trades
                    .iter()
                    .map(|t| t.bars_held as f64)
                    .collect::<Vec<_>>(),
            ),
            final_equity: result.final_equity(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Gross profit / gross loss. `INFINITY` with winners and no losers,
/// 0.0 with no trades or no winners.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();
    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        gross_profit / gross_loss
    }
}

/// Average win / |average loss|, with the profit-factor sentinel convention.
pub fn reward_risk_ratio(trades: &[Trade]) -> f64 {
    let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
    let avg_win = mean_filtered(&pnls, |p| p > 0.0);
    let avg_loss = mean_filtered(&pnls, |p| p < 0.0).abs();
    if avg_loss == 0.0 {
        if avg_win > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        avg_win / avg_loss
    }
}

/// Longest run of consecutive winners (or losers).
pub fn longest_streak(trades: &[Trade], winners: bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Largest peak-to-trough equity drop: (dollars >= 0, percent of the peak).
///
/// Both are 0.0 on an empty or monotonically rising curve.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> (f64, f64) {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    let mut max_dd_pct = 0.0_f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        let dd = peak - point.equity;
        if dd > max_dd {
            max_dd = dd;
            max_dd_pct = if peak > 0.0 { 100.0 * dd / peak } else { 0.0 };
        }
    }
    (max_dd, max_dd_pct)
}

// ─── Monthly breakdown ──────────────────────────────────────────────

/// One calendar month of trading activity, keyed by exit month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    /// `YYYY-MM` of the exits in this row.
    pub month: String,
    pub trades: usize,
    pub pnl: f64,
    pub win_rate_pct: f64,
}

/// Group trades by exit month. The ledger is chronological, so each month
/// forms one contiguous run.
pub fn monthly_breakdown(trades: &[Trade]) -> Vec<MonthlyRow> {
    let mut rows: Vec<MonthlyRow> = Vec::new();
    let mut wins_in_row = 0usize;
    for trade in trades {
        let date = trade.exit_timestamp.date();
        let month = format!("{:04}-{:02}", date.year(), date.month());
        match rows.last_mut() {
            Some(row) if row.month == month => {
                row.trades += 1;
                row.pnl += trade.pnl;
            }
            _ => {
                if let Some(prev) = rows.last_mut() {
                    prev.win_rate_pct = 100.0 * wins_in_row as f64 / prev.trades as f64;
                }
                wins_in_row = 0;
                rows.push(MonthlyRow {
                    month,
                    trades: 1,
                    pnl: trade.pnl,
                    win_rate_pct: 0.0,
                });
            }
        }
        if trade.is_winner() {
            wins_in_row += 1;
        }
    }
    if let Some(last) = rows.last_mut() {
        last.win_rate_pct = 100.0 * wins_in_row as f64 / last.trades as f64;
    }
    rows
}

// ─── P&L distribution ───────────────────────────────────────────────

/// Fixed-bucket histogram of per-trade P&L plus shape statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlDistribution {
    /// Left edge of each bucket; buckets are uniform width.
    pub bucket_edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n − 1). 0.0 with fewer than two trades.
    pub std_dev: f64,
    /// Fisher skewness. 0.0 when the std is zero.
    pub skewness: f64,
}

/// Histogram per-trade P&L into `bins` uniform buckets over [min, max].
///
/// An empty ledger yields empty buckets and zero statistics; a single
/// distinct value collapses into one bucket.
pub fn pnl_distribution(trades: &[Trade], bins: usize) -> PnlDistribution {
    let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
    if pnls.is_empty() || bins == 0 {
        return PnlDistribution {
            bucket_edges: Vec::new(),
            counts: Vec::new(),
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            skewness: 0.0,
        };
    }

    let min = pnls.iter().copied().fold(f64::INFINITY, f64::min);
    let max = pnls.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let (bucket_edges, counts) = if span == 0.0 {
        (vec![min], vec![pnls.len()])
    } else {
        let width = span / bins as f64;
        let edges: Vec<f64> = (0..bins).map(|i| min + i as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &p in &pnls {
            let idx = (((p - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        (edges, counts)
    };

    let mean_v = mean(&pnls);
    let std_dev = sample_std(&pnls, mean_v);
    let skewness = if std_dev > 0.0 {
        let n = pnls.len() as f64;
        pnls.iter()
            .map(|p| ((p - mean_v) / std_dev).powi(3))
            .sum::<f64>()
            / n
    } else {
        0.0
    };

    PnlDistribution {
        bucket_edges,
        counts,
        mean: mean_v,
        median: median(&pnls),
        std_dev,
        skewness,
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_filtered(values: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let kept: Vec<f64> = values.iter().copied().filter(|&v| keep(v)).collect();
    mean(&kept)
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

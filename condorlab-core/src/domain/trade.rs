//! Trade — a closed position with exit cause and realized P&L.

use super::position::{Position, Strikes, TrendBias};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Why a position was closed. Variants are listed in exit-check priority
/// order; a bar matching several rules always records the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Price crossed a long strike: maximum-loss exit.
    Broke,
    /// Price crossed a short strike but not the long: partial-loss exit.
    Breach,
    /// Trend-strength oscillator rose above the exit threshold.
    TrendExit,
    /// Reference-price slope reversal with price diverged from the band.
    ReferenceExit,
    /// Held to planned expiry.
    Expiry,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Broke => "broke",
            ExitReason::Breach => "breach",
            ExitReason::TrendExit => "trend_exit",
            ExitReason::ReferenceExit => "reference_exit",
            ExitReason::Expiry => "expiry",
        }
    }
}

/// A completed round trip: entry → exit. Immutable once created; the trade
/// ledger appends these in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub exit_index: usize,
    pub exit_timestamp: NaiveDateTime,
    pub strikes: Strikes,
    pub credit: f64,
    pub bias: TrendBias,
    pub exit_reason: ExitReason,
    /// Settlement price the payoff was evaluated at.
    pub settle_price: f64,
    /// Realized P&L in account currency.
    pub pnl: f64,
    pub bars_held: usize,
    pub days_held: i64,
    /// Realized P&L as a percent of the position's maximum dollar risk.
    pub pnl_pct_of_max_risk: f64,
}

impl Trade {
    /// Close a position into a trade record.
    ///
    /// `max_risk` is the dollar max loss including fees; a degenerate zero
    /// risk yields a 0.0 percent field rather than a NaN.
    #[allow(clippy::too_many_arguments)]
    pub fn close(
        position: Position,
        entry_timestamp: NaiveDateTime,
        exit_index: usize,
        exit_timestamp: NaiveDateTime,
        exit_reason: ExitReason,
        settle_price: f64,
        pnl: f64,
        max_risk: f64,
    ) -> Self {
        let pnl_pct_of_max_risk = if max_risk > 0.0 {
            100.0 * pnl / max_risk
        } else {
            0.0
        };
        Self {
            entry_index: position.entry_index,
            entry_timestamp,
            exit_index,
            exit_timestamp,
            strikes: position.strikes,
            credit: position.credit,
            bias: position.bias,
            exit_reason,
            settle_price,
            pnl,
            bars_held: exit_index - position.entry_index,
            days_held: (exit_timestamp.date() - entry_timestamp.date()).num_days(),
            pnl_pct_of_max_risk,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}

//! Run result and the engine's failure taxonomy.

use crate::config::{BacktestConfig, ConfigError};
use crate::domain::{EquityPoint, PreconditionError, RejectedEvaluation, Trade};
use crate::indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that stops a run before its loop starts. The loop itself is
/// deterministic and pure given valid inputs, so it has no error path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// The finished run: trade ledger, equity curve, rejection ledger, the
/// indicator frame, and the exact configuration that produced them.
///
/// This is the sole artifact handed to the metrics engine and to any
/// persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub indicators: IndicatorFrame,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub rejections: Vec<RejectedEvaluation>,
}

impl BacktestResult {
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }

    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.config.initial_capital)
    }
}

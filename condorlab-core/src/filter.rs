//! Entry eligibility filter — per-bar admit/reject with a single cause.
//!
//! Checks run in a fixed order so each rejection records exactly one reason
//! even when several conditions fail at once. The order is a diagnostic
//! contract: rejection-reason counts must be deterministic across runs.

use crate::config::BacktestConfig;
use crate::indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};

/// Why a bar was rejected for entry. Ordered by check priority:
/// data sufficiency → trend strength → momentum → volatility → blackout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// An indicator window is not yet satisfied at this bar.
    InsufficientData,
    /// Trend-strength oscillator at or above the entry ceiling.
    TrendStrength,
    /// Momentum oscillator outside the neutral band.
    Momentum,
    /// Realized volatility outside the admissible range.
    Volatility,
    /// Bar falls inside a blackout window.
    Blackout,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InsufficientData => "insufficient_data",
            RejectReason::TrendStrength => "trend_strength",
            RejectReason::Momentum => "momentum",
            RejectReason::Volatility => "volatility",
            RejectReason::Blackout => "blackout",
        }
    }
}

/// Outcome of an entry evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Admit,
    Reject(RejectReason),
}

/// Evaluate entry eligibility at `bar_index`. Pure function of the indicator
/// frame, the blackout mask, and the configured thresholds.
pub fn evaluate_entry(
    bar_index: usize,
    frame: &IndicatorFrame,
    blackout: &[bool],
    config: &BacktestConfig,
) -> Eligibility {
    if !frame.is_defined(bar_index) {
        return Eligibility::Reject(RejectReason::InsufficientData);
    }
    if frame.adx[bar_index] >= config.adx_entry_max {
        return Eligibility::Reject(RejectReason::TrendStrength);
    }
    let rsi = frame.rsi[bar_index];
    if rsi < config.rsi_lower || rsi > config.rsi_upper {
        return Eligibility::Reject(RejectReason::Momentum);
    }
    let hv = frame.hv[bar_index];
    if hv < config.hv_min || hv > config.hv_max {
        return Eligibility::Reject(RejectReason::Volatility);
    }
    if blackout[bar_index] {
        return Eligibility::Reject(RejectReason::Blackout);
    }
    Eligibility::Admit
}

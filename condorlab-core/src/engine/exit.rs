//! Exit state machine — five rules checked in strict priority order.
//!
//! Catastrophic conditions are checked before discretionary signals so a bar
//! that simultaneously breaks a wing and flags a trend change always records
//! the worse outcome. First match wins; nothing below it is evaluated.

use crate::config::BacktestConfig;
use crate::domain::{Bar, ExitReason, Position};
use crate::indicators::IndicatorFrame;

/// An exit match: the rule that fired and the price the payoff settles at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitDecision {
    pub reason: ExitReason,
    pub settle_price: f64,
}

/// Evaluate the exit rules for an open position at bar `i`.
///
/// Broke and Breach trigger on the bar's high/low range and settle at the
/// breached-side extreme; the softer exits settle at the close. Returns
/// `None` while no rule matches.
pub fn evaluate_exit(
    position: &Position,
    i: usize,
    bars: &[Bar],
    frame: &IndicatorFrame,
    config: &BacktestConfig,
) -> Option<ExitDecision> {
    let bar = &bars[i];
    let strikes = &position.strikes;

    // 1. Broke: range crossed a long strike. Maximum loss.
    if bar.low < strikes.long_put {
        return Some(ExitDecision {
            reason: ExitReason::Broke,
            settle_price: bar.low,
        });
    }
    if bar.high > strikes.long_call {
        return Some(ExitDecision {
            reason: ExitReason::Broke,
            settle_price: bar.high,
        });
    }

    // 2. Breach: range crossed a short strike only. Partial loss at the
    //    breached-side extreme.
    if bar.low < strikes.short_put {
        return Some(ExitDecision {
            reason: ExitReason::Breach,
            settle_price: bar.low,
        });
    }
    if bar.high > strikes.short_call {
        return Some(ExitDecision {
            reason: ExitReason::Breach,
            settle_price: bar.high,
        });
    }

    // 3. Trend exit: regime change signalled by the strength oscillator.
    //    NaN during warmup compares false and cannot trigger.
    if frame.adx[i] >= config.adx_exit_min {
        return Some(ExitDecision {
            reason: ExitReason::TrendExit,
            settle_price: bar.close,
        });
    }

    // 4. Reference-price exit: VWAP slope reversal with price diverged from
    //    the band mid, on the side the new slope points away from.
    if i >= 2 && reference_exit_triggered(i, bars, frame, config) {
        return Some(ExitDecision {
            reason: ExitReason::ReferenceExit,
            settle_price: bar.close,
        });
    }

    // 5. Expiry.
    if i >= position.expiry_index {
        return Some(ExitDecision {
            reason: ExitReason::Expiry,
            settle_price: bar.close,
        });
    }

    None
}

fn reference_exit_triggered(
    i: usize,
    bars: &[Bar],
    frame: &IndicatorFrame,
    config: &BacktestConfig,
) -> bool {
    let delta_today = bars[i].vwap - bars[i - 1].vwap;
    let delta_prev = bars[i - 1].vwap - bars[i - 2].vwap;
    let reversal =
        delta_today != 0.0 && delta_prev != 0.0 && delta_today.signum() != delta_prev.signum();
    if !reversal {
        return false;
    }

    let close = bars[i].close;
    let vwap = bars[i].vwap;
    // NaN band half-width compares false: no trigger during warmup.
    let diverged = (close - vwap).abs() >= config.vwap_exit_k * frame.band_half(i);
    let on_slope_side =
        (delta_today > 0.0 && close > vwap) || (delta_today < 0.0 && close < vwap);
    diverged && on_slope_side
}

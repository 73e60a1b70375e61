//! Entry construction — strike selection, wing sizing, credit, and expiry
//! planning for an admitted bar.

use crate::config::BacktestConfig;
use crate::domain::{Bar, Position, Strikes, TrendBias};
use crate::indicators::IndicatorFrame;
use chrono::{Datelike, Weekday};

/// Round a level to the nearest strike step.
pub fn round_strike(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Planned expiry for an entry at `entry_index`: the first bar in the
/// max-hold window whose calendar weekday is Friday, else the window's last
/// bar (clamped to the series end).
pub fn plan_expiry(bars: &[Bar], entry_index: usize, max_hold_bars: usize) -> usize {
    let search_end = (entry_index + max_hold_bars).min(bars.len() - 1);
    for (j, bar) in bars.iter().enumerate().take(search_end + 1).skip(entry_index) {
        if bar.timestamp.weekday() == Weekday::Fri {
            return j;
        }
    }
    search_end
}

/// Build a position at an admitted bar.
///
/// Short strikes sit at the band edges, optionally shifted by the trend
/// bias: an up-trend lifts the whole structure (put +0.5·bias, call
/// +1.0·bias), a down-trend mirrors it. The wing opposite a fresh trend
/// reversal into a tightening band is extended by `wing_ext_pct`. Credit is
/// a configured fraction of the narrower wing.
pub fn open_position(
    i: usize,
    bars: &[Bar],
    frame: &IndicatorFrame,
    config: &BacktestConfig,
) -> Position {
    let step = config.strike_step;
    let lower = frame.band_lower[i];
    let upper = frame.band_upper[i];

    let (short_put, short_call, bias) = if config.use_bias && frame.trend_up[i] {
        let b = config.bias_strength;
        (
            round_strike(lower + 0.5 * b, step),
            round_strike(upper + 1.0 * b, step),
            TrendBias::Up,
        )
    } else if config.use_bias && frame.trend_down[i] {
        let b = config.bias_strength;
        (
            round_strike(lower - 1.0 * b, step),
            round_strike(upper - 0.5 * b, step),
            TrendBias::Down,
        )
    } else {
        (
            round_strike(lower, step),
            round_strike(upper, step),
            TrendBias::None,
        )
    };

    // A fresh reversal into a tightening band widens the wing on the side
    // the old trend pointed at.
    let prev_up = i > 0 && frame.trend_up[i - 1];
    let prev_down = i > 0 && frame.trend_down[i - 1];
    let extension = 1.0 + config.wing_ext_pct / 100.0;

    let put_wing = if frame.trend_up[i] && prev_down && frame.tightening[i] {
        config.wing_width * extension
    } else {
        config.wing_width
    };
    let call_wing = if frame.trend_down[i] && prev_up && frame.tightening[i] {
        config.wing_width * extension
    } else {
        config.wing_width
    };

    // A zero-width band can collapse the rounded short strikes onto one
    // level; the payoff treats that structure as a bare credit and it
    // resolves on the first move, so no special casing is needed here.
    let strikes = Strikes {
        short_put,
        long_put: round_strike(short_put - put_wing, step),
        short_call,
        long_call: round_strike(short_call + call_wing, step),
    };

    let credit = config.credit_multiplier * put_wing.min(call_wing);

    Position {
        entry_index: i,
        expiry_index: plan_expiry(bars, i, config.max_hold_bars),
        strikes,
        credit,
        bias,
    }
}

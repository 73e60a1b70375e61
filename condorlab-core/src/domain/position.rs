//! Position — a live condor — and the one-position-at-a-time state machine.

use serde::{Deserialize, Serialize};

/// The four strike levels of a condor, inner (short) pair sold, outer (long)
/// pair bought. Invariant: long_put < short_put < short_call < long_call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strikes {
    pub short_put: f64,
    pub long_put: f64,
    pub short_call: f64,
    pub long_call: f64,
}

impl Strikes {
    pub fn put_width(&self) -> f64 {
        self.short_put - self.long_put
    }

    pub fn call_width(&self) -> f64 {
        self.long_call - self.short_call
    }

    /// Strike ordering sanity check. Entry construction guarantees this; the
    /// payoff evaluator relies on it.
    pub fn is_ordered(&self) -> bool {
        self.long_put < self.short_put
            && self.short_put < self.short_call
            && self.short_call < self.long_call
    }
}

/// Trend-bias adjustment applied at entry, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBias {
    None,
    Up,
    Down,
}

impl TrendBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendBias::None => "none",
            TrendBias::Up => "up",
            TrendBias::Down => "down",
        }
    }
}

/// An open condor position. Created when the eligibility filter admits a bar,
/// read-only until an exit rule converts it into a `Trade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_index: usize,
    /// Next Friday within the max-hold window, or the window's last bar.
    pub expiry_index: usize,
    pub strikes: Strikes,
    /// Net credit collected at entry, in strike points. Maximum profit.
    pub credit: f64,
    pub bias: TrendBias,
}

impl Position {
    /// Maximum loss in strike points on the narrower side: width − credit.
    pub fn max_loss_points(&self) -> f64 {
        self.strikes.put_width().min(self.strikes.call_width()) - self.credit
    }
}

/// Simulation position state. Two simultaneous open positions are
/// unrepresentable by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Open(Position),
}

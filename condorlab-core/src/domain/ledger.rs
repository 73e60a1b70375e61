//! Per-bar ledger entries: equity points and rejected entry evaluations.

use crate::filter::RejectReason;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Running account balance at a bar. One per bar, realized P&L only —
/// equity moves exactly when a trade closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// A bar where no position was open and the eligibility filter rejected
/// entry. Diagnostic only; never feeds back into simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEvaluation {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub reason: RejectReason,
    /// Indicator snapshot at the rejected bar, for drill-down diagnostics.
    pub adx: f64,
    pub rsi: f64,
    pub hv: f64,
}

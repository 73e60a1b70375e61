//! CondorLab Core — iron condor simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, strikes, positions, trades, ledgers)
//! - Indicator engine (VWAP bands, RSI, ADX/DI, realized volatility, trend flags)
//! - Blackout calendar masking
//! - Entry eligibility filter with single-cause rejection reasons
//! - Condor payoff evaluation
//! - Single-position exit state machine and bar-by-bar orchestrator
//!
//! The simulation is single-threaded and purely deterministic: indicators are
//! precomputed into parallel arrays before the loop, the loop itself performs
//! no I/O, and equity tracks realized P&L only.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod indicators;
pub mod payoff;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: result and ledger types are Send + Sync.
    ///
    /// Concurrent embedders run independent configurations in parallel and
    /// share the price series and indicator frame read-only. If any of these
    /// types loses Send/Sync, the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<domain::EquityPoint>();
        require_sync::<domain::EquityPoint>();
        require_send::<domain::RejectedEvaluation>();
        require_sync::<domain::RejectedEvaluation>();

        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();

        require_send::<calendar::BlackoutCalendar>();
        require_sync::<calendar::BlackoutCalendar>();

        require_send::<config::BacktestConfig>();
        require_sync::<config::BacktestConfig>();

        require_send::<engine::BacktestResult>();
        require_sync::<engine::BacktestResult>();
    }
}

//! Domain types: bars, strikes, positions, trades, and run ledgers.

pub mod bar;
pub mod ledger;
pub mod position;
pub mod trade;

pub use bar::{Bar, PreconditionError, PriceSeries};
pub use ledger::{EquityPoint, RejectedEvaluation};
pub use position::{Position, PositionState, Strikes, TrendBias};
pub use trade::{ExitReason, Trade};

//! Bar — the fundamental market data unit — and the validated price series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar plus a volume-weighted reference price, for a single symbol
/// on a single timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Volume-weighted reference price. Band strikes are anchored on this,
    /// not on close.
    pub vwap: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if every price field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.vwap.is_finite()
    }

    /// Basic OHLC sanity: high is the bar maximum, low the bar minimum.
    pub fn is_sane(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Input-table violations. These fail fast before the bar loop starts;
/// nothing is ever partially simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("timestamps not strictly ascending at row {index}")]
    NonMonotonicTimestamp { index: usize },

    #[error("duplicate timestamp at row {index}")]
    DuplicateTimestamp { index: usize },

    #[error("non-finite price field at row {index}")]
    NonFinitePrice { index: usize },

    #[error("insufficient history: largest indicator window needs {required} bars, series has {available}")]
    InsufficientHistory { required: usize, available: usize },
}

/// A time-ordered price table for a single symbol/timeframe.
///
/// Construction validates the input contract: non-empty, strictly
/// ascending unique timestamps, finite prices. Once built, the series is
/// immutable for the duration of a run and may be shared read-only across
/// concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, PreconditionError> {
        if bars.is_empty() {
            return Err(PreconditionError::EmptySeries);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(PreconditionError::NonFinitePrice { index: i });
            }
            if i > 0 {
                let prev = bars[i - 1].timestamp;
                if bar.timestamp == prev {
                    return Err(PreconditionError::DuplicateTimestamp { index: i });
                }
                if bar.timestamp < prev {
                    return Err(PreconditionError::NonMonotonicTimestamp { index: i });
                }
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar_at(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap(),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            vwap: close - 0.1,
            volume: 50_000,
        }
    }

    #[test]
    fn series_accepts_sorted_bars() {
        let series = PriceSeries::new(vec![bar_at(2, 100.0), bar_at(3, 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn series_rejects_empty() {
        assert_eq!(
            PriceSeries::new(vec![]).unwrap_err(),
            PreconditionError::EmptySeries
        );
    }

    #[test]
    fn series_rejects_duplicate_timestamp() {
        let err = PriceSeries::new(vec![bar_at(2, 100.0), bar_at(2, 101.0)]).unwrap_err();
        assert_eq!(err, PreconditionError::DuplicateTimestamp { index: 1 });
    }

    #[test]
    fn series_rejects_unsorted() {
        let err = PriceSeries::new(vec![bar_at(3, 100.0), bar_at(2, 101.0)]).unwrap_err();
        assert_eq!(err, PreconditionError::NonMonotonicTimestamp { index: 1 });
    }

    #[test]
    fn series_rejects_nan_price() {
        let mut bad = bar_at(3, 101.0);
        bad.vwap = f64::NAN;
        let err = PriceSeries::new(vec![bar_at(2, 100.0), bad]).unwrap_err();
        assert_eq!(err, PreconditionError::NonFinitePrice { index: 1 });
    }

    #[test]
    fn bar_sanity() {
        assert!(bar_at(2, 100.0).is_sane());
        let mut bad = bar_at(2, 100.0);
        bad.high = 98.0; // below low
        assert!(!bad.is_sane());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = bar_at(2, 100.0);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}

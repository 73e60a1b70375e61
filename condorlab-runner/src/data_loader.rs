//! CSV bar loading and blackout date lists.
//!
//! Bars come from a CSV with header
//! `timestamp,open,high,low,close,vwap,volume`. Timestamps accept either
//! `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (daily bars settle at the
//! 16:00 close). Blackout dates are one `YYYY-MM-DD` per line, `#` comments
//! and blank lines ignored.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use condorlab_core::domain::{Bar, PreconditionError, PriceSeries};
use serde::Deserialize;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad CSV record in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp '{value}' at record {record}")]
    BadTimestamp { value: String, record: usize },

    #[error("unparseable date '{value}' at line {line}")]
    BadDate { value: String, line: usize },

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    vwap: f64,
    volume: u64,
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(16, 0, 0))
}

/// Load a validated price series from a bar CSV.
pub fn load_bars_csv(path: &Path) -> Result<PriceSeries, LoadError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let mut bars = Vec::new();
    for (record, row) in reader.deserialize::<BarRecord>().enumerate() {
        let row = row.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| LoadError::BadTimestamp {
            value: row.timestamp.clone(),
            record,
        })?;
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            vwap: row.vwap,
            volume: row.volume,
        });
    }
    Ok(PriceSeries::new(bars)?)
}

/// Load a blackout date list, one date per line.
pub fn load_blackout_dates(path: &Path) -> Result<Vec<NaiveDate>, LoadError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display,
        source,
    })?;

    let mut dates = Vec::new();
    for (line, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let date =
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| LoadError::BadDate {
                value: trimmed.to_string(),
                line: line + 1,
            })?;
        dates.push(date);
    }
    Ok(dates)
}

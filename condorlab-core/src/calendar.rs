//! Blackout calendar — event dates around which new entries are disallowed.

use crate::domain::Bar;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A set of calendar dates (earnings, known events). The per-bar mask is a
/// pure function of the dates, the lead/lag margins, and the bar timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackoutCalendar {
    dates: Vec<NaiveDate>,
}

impl BlackoutCalendar {
    pub fn new(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Per-bar blackout mask: true where the bar's calendar date falls within
    /// `[event - days_before, event + days_after]` of any listed event.
    /// Overlapping windows union.
    pub fn mask(&self, bars: &[Bar], days_before: i64, days_after: i64) -> Vec<bool> {
        let mut mask = vec![false; bars.len()];
        if self.dates.is_empty() {
            return mask;
        }
        for &event in &self.dates {
            let window_start = event - Duration::days(days_before);
            let window_end = event + Duration::days(days_after);
            for (slot, bar) in mask.iter_mut().zip(bars) {
                let date = bar.timestamp.date();
                if date >= window_start && date <= window_end {
                    *slot = true;
                }
            }
        }
        mask
    }
}

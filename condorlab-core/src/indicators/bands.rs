//! Volatility-weighted band — rolling mean ± k·σ of the VWAP series.
//!
//! The band edges are the candidate short strikes; band width feeds the
//! tightening flag used by the wing-extension rule.

use super::{rolling_mean, rolling_median, rolling_std};

/// Parallel band arrays, one value per bar.
#[derive(Debug, Clone)]
pub struct BandSeries {
    pub mid: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

/// Compute the band over the VWAP series: mid = rolling mean,
/// upper/lower = mid ± k·(rolling population std).
pub fn vwap_bands(vwap: &[f64], window: usize, k: f64) -> BandSeries {
    let mid = rolling_mean(vwap, window);
    let std = rolling_std(vwap, window);
    let n = vwap.len();
    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];
    let mut width = vec![f64::NAN; n];
    for i in 0..n {
        if mid[i].is_nan() || std[i].is_nan() {
            continue;
        }
        upper[i] = mid[i] + k * std[i];
        lower[i] = mid[i] - k * std[i];
        width[i] = upper[i] - lower[i];
    }
    BandSeries {
        mid,
        upper,
        lower,
        width,
    }
}

/// Minimum finite width samples before the tightening median is meaningful.
const TIGHTENING_MIN_PERIODS: usize = 5;

/// Band tightening flag: width shrinking bar-over-bar AND below its rolling
/// median. Undefined (NaN) inputs yield false.
pub fn band_tightening(width: &[f64], window: usize) -> Vec<bool> {
    let median = rolling_median(width, window, TIGHTENING_MIN_PERIODS);
    let n = width.len();
    let mut flags = vec![false; n];
    for i in 1..n {
        let (w, prev, med) = (width[i], width[i - 1], median[i]);
        if w.is_nan() || prev.is_nan() || med.is_nan() {
            continue;
        }
        flags[i] = w < prev && w < med;
    }
    flags
}

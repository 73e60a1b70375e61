//! Indicator engine — rolling-window computations over the bar sequence.
//!
//! Every indicator is computed once per run into a full-length array, never
//! inside the bar loop. `f64::NAN` is the undefined sentinel for bars before
//! a window has enough history; the eligibility filter treats NaN as
//! automatically ineligible.

pub mod adx;
pub mod bands;
pub mod frame;
pub mod rsi;
pub mod volatility;

pub use adx::{directional_system, DirectionalSeries};
pub use bands::{band_tightening, vwap_bands, BandSeries};
pub use frame::IndicatorFrame;
pub use rsi::rsi;
pub use volatility::realized_volatility;

use crate::domain::Bar;

/// Rolling mean with a full-window requirement: NaN until `window` values
/// are available, NaN wherever the window contains a NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }
    result
}

/// Rolling population (ddof = 0) standard deviation, same NaN policy as
/// `rolling_mean`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / window as f64;
        result[i] = var.sqrt();
    }
    result
}

/// Rolling median over the last `window` values, ignoring NaNs; defined once
/// at least `min_periods` finite samples are in the window.
pub fn rolling_median(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 {
        return result;
    }
    let mut buf: Vec<f64> = Vec::with_capacity(window);
    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        buf.clear();
        buf.extend(values[start..=i].iter().copied().filter(|v| !v.is_nan()));
        if buf.len() < min_periods.max(1) {
            continue;
        }
        buf.sort_unstable_by(f64::total_cmp);
        let mid = buf.len() / 2;
        result[i] = if buf.len() % 2 == 1 {
            buf[mid]
        } else {
            (buf[mid - 1] + buf[mid]) / 2.0
        };
    }
    result
}

/// True Range series.
/// TR[0] = high[0] - low[0] (no previous close);
/// TR[t] = max(high-low, |high-prev_close|, |low-prev_close|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    if n == 0 {
        return tr;
    }
    tr[0] = bars[0].high - bars[0].low;
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Wilder smoothing (EMA with alpha = 1/period), seeded with the mean of the
/// first `period` consecutive non-NaN values. NaN before the seed completes.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let seed_start = (0..n).find(|&i| {
        i + period <= n && values[i..i + period].iter().all(|v| !v.is_nan())
    });
    let seed_start = match seed_start {
        Some(s) => s,
        None => return result,
    };
    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }
    result
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev close, high/low = ±1.0 around the open/close hull,
/// vwap = (high + low + close) / 3, daily timestamps.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                vwap: (high + low + close) / 3.0,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_mean_full_window_only() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let result = rolling_mean(&values, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, 1e-12);
        assert_approx(result[3], 3.0, 1e-12);
    }

    #[test]
    fn rolling_std_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = rolling_std(&values, 8);
        // Classic example: population std of this set is exactly 2.
        assert_approx(result[7], 2.0, 1e-12);
    }

    #[test]
    fn rolling_std_nan_in_window() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let result = rolling_std(&values, 3);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(!result[4].is_nan());
    }

    #[test]
    fn rolling_median_ignores_nan_with_min_periods() {
        let values = [f64::NAN, 1.0, 5.0, 3.0];
        let result = rolling_median(&values, 4, 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan()); // one finite sample, below min_periods
        assert_approx(result[2], 3.0, 1e-12);
        assert_approx(result[3], 3.0, 1e-12);
    }

    #[test]
    fn true_range_uses_previous_close() {
        let bars = make_bars(&[100.0, 103.0]);
        let tr = true_range(&bars);
        // Bar 1: open 100, close 103 → high 104, low 99; prev close 100.
        assert_approx(tr[1], 5.0, 1e-12);
    }

    #[test]
    fn wilder_smooth_seed_and_decay() {
        let values = [f64::NAN, 2.0, 4.0, 6.0, 8.0];
        let result = wilder_smooth(&values, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 4.0, 1e-12); // seed = mean(2,4,6)
        assert_approx(result[4], (1.0 / 3.0) * 8.0 + (2.0 / 3.0) * 4.0, 1e-12);
    }

    #[test]
    fn wilder_smooth_short_input_all_nan() {
        let result = wilder_smooth(&[1.0, 2.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}

//! Realized-volatility estimator — annualized rolling std of log returns.

use super::rolling_std;

/// Realized volatility as a percent: rolling population std of log close
/// returns, scaled by sqrt(annualization_factor) · 100.
///
/// NaN for the first `window` bars (one return is consumed before the
/// rolling window starts filling).
pub fn realized_volatility(closes: &[f64], window: usize, annualization_factor: f64) -> Vec<f64> {
    let n = closes.len();
    let mut log_returns = vec![f64::NAN; n];
    for i in 1..n {
        if closes[i] > 0.0 && closes[i - 1] > 0.0 {
            log_returns[i] = (closes[i] / closes[i - 1]).ln();
        }
    }
    let std = rolling_std(&log_returns, window);
    std.into_iter()
        .map(|s| {
            if s.is_nan() {
                f64::NAN
            } else {
                s * annualization_factor.sqrt() * 100.0
            }
        })
        .collect()
}

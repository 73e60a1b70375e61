//! IndicatorFrame — every indicator array the simulation consumes, computed
//! in one pass before the bar loop and held read-only for its duration.

use super::{band_tightening, directional_system, realized_volatility, rolling_mean, rsi,
    vwap_bands};
use crate::config::{BacktestConfig, TrendMethod};
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// ADX strength gate for the directional-dominance trend method.
const DIRECTIONAL_STRENGTH_MIN: f64 = 20.0;

/// Per-bar indicator arrays, all aligned 1:1 with the bar sequence.
/// `f64::NAN` marks bars before a rolling window is satisfied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub band_mid: Vec<f64>,
    pub band_upper: Vec<f64>,
    pub band_lower: Vec<f64>,
    pub band_width: Vec<f64>,
    pub rsi: Vec<f64>,
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub hv: Vec<f64>,
    pub vwap_sma: Vec<f64>,
    pub tightening: Vec<bool>,
    pub trend_up: Vec<bool>,
    pub trend_down: Vec<bool>,
}

impl IndicatorFrame {
    /// Compute every array for a run. One pass, no per-bar allocation later.
    pub fn compute(bars: &[Bar], config: &BacktestConfig) -> Self {
        let vwap: Vec<f64> = bars.iter().map(|b| b.vwap).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let bands = vwap_bands(&vwap, config.band_window, config.band_k);
        let tightening = band_tightening(&bands.width, config.tightening_window);
        let directional = directional_system(bars, config.adx_period);
        let rsi = rsi(&close, config.rsi_period);
        let hv = realized_volatility(
            &close,
            config.hv_window,
            config.timeframe.annualization_factor(),
        );
        let vwap_sma = rolling_mean(&vwap, config.vwap_sma_window);

        let (trend_up, trend_down) = trend_flags(
            config.trend_method,
            &vwap,
            &vwap_sma,
            &directional.adx,
            &directional.plus_di,
            &directional.minus_di,
        );

        Self {
            band_mid: bands.mid,
            band_upper: bands.upper,
            band_lower: bands.lower,
            band_width: bands.width,
            rsi,
            adx: directional.adx,
            plus_di: directional.plus_di,
            minus_di: directional.minus_di,
            hv,
            vwap_sma,
            tightening,
            trend_up,
            trend_down,
        }
    }

    pub fn len(&self) -> usize {
        self.adx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adx.is_empty()
    }

    /// Half the band height at a bar (upper − mid); NaN during warmup.
    pub fn band_half(&self, i: usize) -> f64 {
        self.band_upper[i] - self.band_mid[i]
    }

    /// True when every array the eligibility filter reads is defined at `i`.
    pub fn is_defined(&self, i: usize) -> bool {
        !self.adx[i].is_nan()
            && !self.rsi[i].is_nan()
            && !self.hv[i].is_nan()
            && !self.band_upper[i].is_nan()
            && !self.band_lower[i].is_nan()
    }
}

/// Boolean trend-direction flags per bar, for the selected method only.
fn trend_flags(
    method: TrendMethod,
    vwap: &[f64],
    vwap_sma: &[f64],
    adx: &[f64],
    plus_di: &[f64],
    minus_di: &[f64],
) -> (Vec<bool>, Vec<bool>) {
    let n = vwap.len();
    let mut up = vec![false; n];
    let mut down = vec![false; n];

    match method {
        TrendMethod::VwapSlope => {
            for i in 1..n {
                let delta = vwap[i] - vwap[i - 1];
                up[i] = delta > 0.0;
                down[i] = delta < 0.0;
            }
        }
        TrendMethod::VwapVsSma => {
            for i in 0..n {
                if vwap_sma[i].is_nan() {
                    continue;
                }
                up[i] = vwap[i] > vwap_sma[i];
                down[i] = vwap[i] < vwap_sma[i];
            }
        }
        TrendMethod::AdxDirectional => {
            for i in 0..n {
                if adx[i].is_nan() || plus_di[i].is_nan() || minus_di[i].is_nan() {
                    continue;
                }
                let strong = adx[i] > DIRECTIONAL_STRENGTH_MIN;
                up[i] = strong && plus_di[i] > minus_di[i];
                down[i] = strong && minus_di[i] > plus_di[i];
            }
        }
    }
    (up, down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn small_config() -> BacktestConfig {
        BacktestConfig {
            band_window: 5,
            rsi_period: 3,
            adx_period: 3,
            hv_window: 5,
            vwap_sma_window: 5,
            tightening_window: 5,
            ..Default::default()
        }
    }

    fn wavy_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.8).sin() * 2.0).collect()
    }

    #[test]
    fn all_arrays_share_bar_length() {
        let bars = make_bars(&wavy_closes(30));
        let frame = IndicatorFrame::compute(&bars, &small_config());
        assert_eq!(frame.len(), 30);
        assert_eq!(frame.band_mid.len(), 30);
        assert_eq!(frame.hv.len(), 30);
        assert_eq!(frame.trend_up.len(), 30);
        assert_eq!(frame.tightening.len(), 30);
    }

    #[test]
    fn warmup_bars_are_undefined() {
        let bars = make_bars(&wavy_closes(30));
        let config = small_config();
        let frame = IndicatorFrame::compute(&bars, &config);
        for i in 0..config.warmup_bars() - 1 {
            assert!(!frame.is_defined(i), "bar {i} unexpectedly defined");
        }
        assert!(frame.is_defined(config.warmup_bars()));
    }

    #[test]
    fn vwap_slope_flags_are_exclusive() {
        let bars = make_bars(&wavy_closes(30));
        let frame = IndicatorFrame::compute(&bars, &small_config());
        for i in 0..frame.len() {
            assert!(!(frame.trend_up[i] && frame.trend_down[i]));
        }
    }

    #[test]
    fn vwap_vs_sma_uptrend_flags_up() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let config = BacktestConfig {
            trend_method: TrendMethod::VwapVsSma,
            ..small_config()
        };
        let frame = IndicatorFrame::compute(&bars, &config);
        let last = frame.len() - 1;
        assert!(frame.trend_up[last]);
        assert!(!frame.trend_down[last]);
    }

    #[test]
    fn adx_directional_uptrend_flags_up() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 4.0).collect();
        let bars = make_bars(&closes);
        let config = BacktestConfig {
            trend_method: TrendMethod::AdxDirectional,
            ..small_config()
        };
        let frame = IndicatorFrame::compute(&bars, &config);
        let last = frame.len() - 1;
        assert!(frame.trend_up[last]);
        assert!(!frame.trend_down[last]);
    }
}

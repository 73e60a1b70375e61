//! Backtest configuration: every threshold the engine consumes, with serde
//! defaults and build-time validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bar timeframe. Drives the realized-volatility annualization factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Hourly,
    Min30,
    Min15,
    Min5,
    Min1,
}

impl Timeframe {
    /// Number of bars in one trading day (6.5-hour US equity session).
    pub fn bars_per_day(&self) -> f64 {
        match self {
            Timeframe::Daily => 1.0,
            Timeframe::Hourly => 6.5,
            Timeframe::Min30 => 13.0,
            Timeframe::Min15 => 26.0,
            Timeframe::Min5 => 78.0,
            Timeframe::Min1 => 390.0,
        }
    }

    /// Annualization factor for volatility of per-bar log returns:
    /// 252 trading days scaled by bars per day.
    pub fn annualization_factor(&self) -> f64 {
        252.0 * self.bars_per_day()
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Daily
    }
}

/// Trend-direction detection method. Exactly one is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMethod {
    /// Sign of the bar-to-bar VWAP delta.
    VwapSlope,
    /// VWAP above/below its slower moving average.
    VwapVsSma,
    /// +DI/−DI dominance, gated by ADX strength.
    AdxDirectional,
}

impl Default for TrendMethod {
    fn default() -> Self {
        TrendMethod::VwapSlope
    }
}

/// Out-of-range threshold, caught once at configuration-build time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} window must be >= {min}, got {got}")]
    WindowTooSmall {
        name: &'static str,
        min: usize,
        got: usize,
    },

    #[error("{name} must be positive, got {got}")]
    NonPositive { name: &'static str, got: f64 },

    #[error("{name} must be non-negative, got {got}")]
    Negative { name: &'static str, got: f64 },

    #[error("volatility band inverted: min {min} > max {max}")]
    InvertedVolatilityBand { min: f64, max: f64 },

    #[error("momentum band invalid: [{lower}, {upper}] must sit inside [0, 100] with lower < upper")]
    InvalidMomentumBand { lower: f64, upper: f64 },

    #[error("credit multiplier must be in (0, 1), got {got}")]
    CreditMultiplierOutOfRange { got: f64 },
}

/// Complete configuration for a single backtest run.
///
/// All fields have serde defaults so a TOML config only needs to override
/// what it changes. `validate` must pass before the engine will run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    // ── Indicator windows ──
    pub band_window: usize,
    /// Band width in standard deviations.
    pub band_k: f64,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub hv_window: usize,
    pub vwap_sma_window: usize,
    pub tightening_window: usize,
    pub timeframe: Timeframe,

    // ── Entry thresholds ──
    /// Admit only while ADX is below this.
    pub adx_entry_max: f64,
    /// Neutral momentum band, inclusive.
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    /// Admissible realized-volatility range, percent annualized.
    pub hv_min: f64,
    pub hv_max: f64,

    // ── Blackout calendar margins ──
    pub blackout_days_before: i64,
    pub blackout_days_after: i64,

    // ── Strike construction ──
    pub wing_width: f64,
    /// Wing extension percent applied opposite a fresh trend reversal into a
    /// tightening band.
    pub wing_ext_pct: f64,
    /// Net credit as a fraction of the narrower wing width.
    pub credit_multiplier: f64,
    pub strike_step: f64,
    pub use_bias: bool,
    /// Dollar shift applied to short strikes when trend bias is on.
    pub bias_strength: f64,
    pub trend_method: TrendMethod,

    // ── Exit thresholds ──
    pub adx_exit_min: f64,
    /// Band-half-width multiples of price/VWAP divergence for the
    /// reference-price exit.
    pub vwap_exit_k: f64,
    pub max_hold_bars: usize,

    // ── Accounting ──
    pub initial_capital: f64,
    pub contract_multiplier: f64,
    pub per_leg_fee: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            band_window: 20,
            band_k: 2.0,
            rsi_period: 14,
            adx_period: 14,
            hv_window: 21,
            vwap_sma_window: 20,
            tightening_window: 20,
            timeframe: Timeframe::Daily,
            adx_entry_max: 20.0,
            rsi_lower: 40.0,
            rsi_upper: 60.0,
            hv_min: 15.0,
            hv_max: 40.0,
            blackout_days_before: 7,
            blackout_days_after: 1,
            wing_width: 5.0,
            wing_ext_pct: 20.0,
            credit_multiplier: 0.30,
            strike_step: 1.0,
            use_bias: false,
            bias_strength: 2.0,
            trend_method: TrendMethod::VwapSlope,
            adx_exit_min: 30.0,
            vwap_exit_k: 1.0,
            max_hold_bars: 5,
            initial_capital: 10_000.0,
            contract_multiplier: 100.0,
            per_leg_fee: 0.65,
        }
    }
}

impl BacktestConfig {
    /// Validate every threshold once, before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows: [(&'static str, usize, usize); 6] = [
            ("band", self.band_window, 2),
            ("rsi", self.rsi_period, 1),
            ("adx", self.adx_period, 1),
            ("hv", self.hv_window, 2),
            ("vwap_sma", self.vwap_sma_window, 1),
            ("max_hold", self.max_hold_bars, 1),
        ];
        for (name, got, min) in windows {
            if got < min {
                return Err(ConfigError::WindowTooSmall { name, min, got });
            }
        }

        let positives: [(&'static str, f64); 4] = [
            ("band_k", self.band_k),
            ("wing_width", self.wing_width),
            ("strike_step", self.strike_step),
            ("contract_multiplier", self.contract_multiplier),
        ];
        for (name, got) in positives {
            if got <= 0.0 || !got.is_finite() {
                return Err(ConfigError::NonPositive { name, got });
            }
        }

        let non_negatives: [(&'static str, f64); 5] = [
            ("wing_ext_pct", self.wing_ext_pct),
            ("per_leg_fee", self.per_leg_fee),
            ("bias_strength", self.bias_strength),
            ("blackout_days_before", self.blackout_days_before as f64),
            ("blackout_days_after", self.blackout_days_after as f64),
        ];
        for (name, got) in non_negatives {
            if got < 0.0 || !got.is_finite() {
                return Err(ConfigError::Negative { name, got });
            }
        }

        if self.hv_min > self.hv_max {
            return Err(ConfigError::InvertedVolatilityBand {
                min: self.hv_min,
                max: self.hv_max,
            });
        }
        if self.rsi_lower >= self.rsi_upper || self.rsi_lower < 0.0 || self.rsi_upper > 100.0 {
            return Err(ConfigError::InvalidMomentumBand {
                lower: self.rsi_lower,
                upper: self.rsi_upper,
            });
        }
        if self.credit_multiplier <= 0.0 || self.credit_multiplier >= 1.0 {
            return Err(ConfigError::CreditMultiplierOutOfRange {
                got: self.credit_multiplier,
            });
        }
        Ok(())
    }

    /// Number of leading bars before every indicator array is defined.
    ///
    /// ADX needs two Wilder passes (2·period), RSI one change plus its seed,
    /// HV one return plus its window, the VWAP SMA and band their windows.
    pub fn warmup_bars(&self) -> usize {
        (2 * self.adx_period)
            .max(self.rsi_period + 1)
            .max(self.hv_window + 1)
            .max(self.band_window)
            .max(self.vwap_sma_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(BacktestConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_hv_band() {
        let cfg = BacktestConfig {
            hv_min: 50.0,
            hv_max: 10.0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate().unwrap_err(),
            ConfigError::InvertedVolatilityBand {
                min: 50.0,
                max: 10.0
            }
        );
    }

    #[test]
    fn rejects_degenerate_band_window() {
        let cfg = BacktestConfig {
            band_window: 1,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::WindowTooSmall { name: "band", .. }
        ));
    }

    #[test]
    fn rejects_momentum_band_outside_scale() {
        let cfg = BacktestConfig {
            rsi_upper: 140.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidMomentumBand { .. }
        ));
    }

    #[test]
    fn rejects_credit_multiplier_of_one() {
        let cfg = BacktestConfig {
            credit_multiplier: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::CreditMultiplierOutOfRange { .. }
        ));
    }

    #[test]
    fn warmup_covers_double_smoothed_adx() {
        let cfg = BacktestConfig::default();
        assert_eq!(cfg.warmup_bars(), 28);
    }

    #[test]
    fn annualization_scales_with_timeframe() {
        assert_eq!(Timeframe::Daily.annualization_factor(), 252.0);
        assert_eq!(Timeframe::Min5.annualization_factor(), 252.0 * 78.0);
    }

    #[test]
    fn config_toml_roundtrip_with_defaults() {
        let cfg: BacktestConfig = toml::from_str("hv_min = 5.0\nhv_max = 60.0\n").unwrap();
        assert_eq!(cfg.hv_min, 5.0);
        assert_eq!(cfg.band_window, 20);
    }
}

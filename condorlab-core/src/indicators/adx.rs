//! Trend-strength oscillator — Wilder ADX with its directional components.
//!
//! 1. +DM / -DM from consecutive highs and lows
//! 2. Wilder-smooth +DM, -DM, and true range
//! 3. ±DI = 100 · smoothed(±DM) / smoothed(TR)
//! 4. DX = 100 · |+DI − −DI| / (+DI + −DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Lookback: 2·period (one smoothing pass for the DIs, one more for ADX).

use super::{true_range, wilder_smooth};
use crate::domain::Bar;

/// ADX plus the two directional sub-components, one value per bar.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// Compute the directional system over a bar sequence.
pub fn directional_system(bars: &[Bar], period: usize) -> DirectionalSeries {
    let n = bars.len();
    let nan = vec![f64::NAN; n];
    if n < 2 || period == 0 {
        return DirectionalSeries {
            adx: nan.clone(),
            plus_di: nan.clone(),
            minus_di: nan,
        };
    }

    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;
        plus_dm[i] = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        minus_dm[i] = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };
    }

    let tr = true_range(bars);
    let smooth_tr = wilder_smooth(&tr, period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        if smooth_tr[i].is_nan()
            || smooth_plus[i].is_nan()
            || smooth_minus[i].is_nan()
            || smooth_tr[i] == 0.0
        {
            continue;
        }
        let pdi = 100.0 * smooth_plus[i] / smooth_tr[i];
        let mdi = 100.0 * smooth_minus[i] / smooth_tr[i];
        plus_di[i] = pdi;
        minus_di[i] = mdi;

        let di_sum = pdi + mdi;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (pdi - mdi).abs() / di_sum
        };
    }

    DirectionalSeries {
        adx: wilder_smooth(&dx, period),
        plus_di,
        minus_di,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn adx_bounds() {
        let closes = [
            102.0, 106.0, 99.0, 101.0, 105.0, 108.0, 110.0, 105.0, 107.0, 112.0, 104.0, 109.0,
        ];
        let system = directional_system(&make_bars(&closes), 3);
        for (i, &v) in system.adx.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn uptrend_favors_plus_di() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 5.0).collect();
        let system = directional_system(&make_bars(&closes), 4);
        let last = system.adx.len() - 1;
        assert!(system.plus_di[last] > system.minus_di[last]);
        assert!(system.adx[last] > 20.0, "ADX should be elevated in a strong trend");
    }

    #[test]
    fn downtrend_favors_minus_di() {
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - i as f64 * 5.0).collect();
        let system = directional_system(&make_bars(&closes), 4);
        let last = system.adx.len() - 1;
        assert!(system.minus_di[last] > system.plus_di[last]);
    }

    #[test]
    fn adx_warmup_spans_two_smoothing_passes() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let system = directional_system(&make_bars(&closes), 4);
        // DX first defined at index 4, ADX seed completes at index 7.
        for v in &system.adx[..7] {
            assert!(v.is_nan());
        }
        assert!(!system.adx[8].is_nan());
    }

    #[test]
    fn too_few_bars_all_nan() {
        let system = directional_system(&make_bars(&[100.0]), 3);
        assert!(system.adx.iter().all(|v| v.is_nan()));
    }
}

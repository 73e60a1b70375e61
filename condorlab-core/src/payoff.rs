//! Condor payoff evaluation — credit kept between the short strikes, linear
//! loss between a short and long strike, flat (maximum) loss beyond the wing.

use crate::domain::Strikes;

/// Realized P&L in account currency for a condor settled at `settle_price`.
///
/// - Between the short strikes: full credit.
/// - Put side: loss grows linearly from zero at the short put to
///   width − credit at the long put; penetration past the long put is
///   clamped — loss beyond the wing is bounded.
/// - Call side symmetric. Only one side can be penetrated at a given price.
///
/// `credit` is in strike points; the result is scaled by the contract
/// multiplier, with four per-leg fees deducted.
pub fn condor_pnl(
    strikes: &Strikes,
    credit: f64,
    settle_price: f64,
    contract_multiplier: f64,
    per_leg_fee: f64,
) -> f64 {
    let fees = 4.0 * per_leg_fee;
    let penetration = if settle_price < strikes.short_put {
        (strikes.short_put - settle_price).min(strikes.put_width())
    } else if settle_price > strikes.short_call {
        (settle_price - strikes.short_call).min(strikes.call_width())
    } else {
        0.0
    };
    (credit - penetration) * contract_multiplier - fees
}

/// Maximum dollar loss of a position: narrower wing width minus credit,
/// scaled, plus fees. The denominator for P&L-as-percent-of-risk.
pub fn max_risk(
    strikes: &Strikes,
    credit: f64,
    contract_multiplier: f64,
    per_leg_fee: f64,
) -> f64 {
    let wing = strikes.put_width().min(strikes.call_width());
    (wing - credit) * contract_multiplier + 4.0 * per_leg_fee
}

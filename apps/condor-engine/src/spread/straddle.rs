//! ATM straddle pricing and 2-sigma target strikes.
//!
//! The straddle price proxies the market's expected move for the
//! expiration; initial spreads for both the condor search and the
//! untested side of a roll start two straddles out from spot.

use rust_decimal::Decimal;

use super::{Spread, build_spread};
use crate::chain::{ContractPool, OptionQuote, OptionRight};

/// Rounded ATM straddle price: ATM call ask + ATM put ask.
///
/// ATM means the contract whose strike minimizes |strike - spot| on its
/// side. The pool guarantees both sides are non-empty.
#[must_use]
pub fn straddle_price(pool: &ContractPool, spot: Decimal) -> Decimal {
    let call_ask = atm_ask(pool.calls(), spot);
    let put_ask = atm_ask(pool.puts(), spot);
    (call_ask + put_ask).round()
}

fn atm_ask(candidates: &[OptionQuote], spot: Decimal) -> Decimal {
    candidates
        .iter()
        .min_by_key(|c| (c.strike - spot).abs())
        .map(|c| c.ask)
        .unwrap_or_default()
}

/// Initial 2-standard-deviation target short strike for a side.
///
/// Spot plus (calls) or minus (puts) two straddles, snapped to the
/// nearest multiple of 5.
#[must_use]
pub fn initial_target_strike(spot: Decimal, straddle: Decimal, right: OptionRight) -> Decimal {
    let raw = match right {
        OptionRight::Call => spot + Decimal::TWO * straddle,
        OptionRight::Put => spot - Decimal::TWO * straddle,
    };
    let five = Decimal::new(5, 0);
    (raw / five).round() * five
}

/// Build the initial spread for one side at its 2-sigma target strike.
#[must_use]
pub fn initial_spread(
    candidates: &[OptionQuote],
    spot: Decimal,
    straddle: Decimal,
    right: OptionRight,
    spread_width: Decimal,
) -> Option<Spread> {
    let target = initial_target_strike(spot, straddle, right);
    build_spread(candidates, target, spread_width)
}

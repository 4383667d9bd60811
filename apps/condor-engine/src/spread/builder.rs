//! Spread construction over ordered candidate lists.
//!
//! Pure functions, no state. `None` always means "no spread at this
//! strike" and callers treat it as an ordinary not-found outcome.

use rust_decimal::Decimal;

use super::Spread;
use crate::chain::{OptionQuote, OptionRight};

/// Build a spread with the given target short strike.
///
/// The short leg is the exact strike match when listed, otherwise the
/// candidate nearest the target (ties broken by scan order). The long
/// leg target is `spread_width` farther out; the same exact-then-nearest
/// rule applies, restricted to candidates strictly beyond the short leg.
/// Returns `None` when `candidates` is empty or no candidate sits beyond
/// the short leg.
#[must_use]
pub fn build_spread(
    candidates: &[OptionQuote],
    target_short_strike: Decimal,
    spread_width: Decimal,
) -> Option<Spread> {
    let short = find_at_or_nearest(candidates, target_short_strike)?;

    let (target_long_strike, beyond): (Decimal, Vec<&OptionQuote>) = match short.right {
        OptionRight::Call => (
            short.strike + spread_width,
            candidates.iter().filter(|c| c.strike > short.strike).collect(),
        ),
        OptionRight::Put => (
            short.strike - spread_width,
            candidates.iter().filter(|c| c.strike < short.strike).collect(),
        ),
    };

    let long = beyond
        .iter()
        .find(|c| c.strike == target_long_strike)
        .copied()
        .or_else(|| {
            beyond
                .iter()
                .min_by_key(|c| (c.strike - target_long_strike).abs())
                .copied()
        })?;

    Spread::from_legs(short, long)
}

/// Build a spread whose short leg is the first candidate at or under a
/// delta target.
///
/// Candidates scan in list order (nearest-the-money outward); the first
/// contract with absolute delta at or below `max_delta` whose exact
/// `spread_width`-away long strike is listed on the protective side
/// wins. Used by the roll engine to rebuild a tested side.
#[must_use]
pub fn spread_at_target_delta(
    candidates: &[OptionQuote],
    max_delta: Decimal,
    spread_width: Decimal,
) -> Option<Spread> {
    for short in candidates {
        if short.delta > max_delta {
            continue;
        }

        let target_long_strike = match short.right {
            OptionRight::Call => short.strike + spread_width,
            OptionRight::Put => short.strike - spread_width,
        };

        let Some(long) = candidates.iter().find(|c| c.strike == target_long_strike) else {
            continue;
        };

        if let Some(spread) = Spread::from_legs(short, long) {
            return Some(spread);
        }
    }

    None
}

/// Exact strike match, falling back to the nearest candidate.
fn find_at_or_nearest(candidates: &[OptionQuote], strike: Decimal) -> Option<&OptionQuote> {
    candidates
        .iter()
        .find(|c| c.strike == strike)
        .or_else(|| candidates.iter().min_by_key(|c| (c.strike - strike).abs()))
}

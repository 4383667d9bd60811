//! Spread building and straddle estimation.

mod builder;
mod straddle;

pub use builder::{build_spread, spread_at_target_delta};
pub use straddle::{initial_spread, initial_target_strike, straddle_price};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::{ContractId, OptionQuote, OptionRight};

/// A two-leg credit spread on one side of the condor.
///
/// Derived, immutable value: consumed immediately to update a [`Trade`]
/// and then discarded. Credit is `short.bid - long.ask` rounded to
/// cents; delta is the short leg's absolute delta.
///
/// Invariant: the long strike is strictly farther from the money than
/// the short strike (call: long > short, put: long < short). A build
/// violating this is rejected, never returned.
///
/// [`Trade`]: crate::lifecycle::Trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    short_id: ContractId,
    short_strike: Decimal,
    long_id: ContractId,
    long_strike: Decimal,
    right: OptionRight,
    credit: Decimal,
    delta: Decimal,
}

impl Spread {
    /// Assemble a spread from its legs, enforcing the long-leg invariant.
    ///
    /// Returns `None` when the legs disagree on side or the long leg is
    /// not strictly farther out than the short leg.
    #[must_use]
    pub fn from_legs(short: &OptionQuote, long: &OptionQuote) -> Option<Self> {
        if short.right != long.right {
            return None;
        }
        let protected = match short.right {
            OptionRight::Call => long.strike > short.strike,
            OptionRight::Put => long.strike < short.strike,
        };
        if !protected {
            return None;
        }
        Some(Self {
            short_id: short.id.clone(),
            short_strike: short.strike,
            long_id: long.id.clone(),
            long_strike: long.strike,
            right: short.right,
            credit: (short.bid - long.ask).round_dp(2),
            delta: short.delta,
        })
    }

    /// Short leg contract identifier.
    #[must_use]
    pub const fn short_id(&self) -> &ContractId {
        &self.short_id
    }

    /// Short leg strike.
    #[must_use]
    pub const fn short_strike(&self) -> Decimal {
        self.short_strike
    }

    /// Long leg contract identifier.
    #[must_use]
    pub const fn long_id(&self) -> &ContractId {
        &self.long_id
    }

    /// Long leg strike.
    #[must_use]
    pub const fn long_strike(&self) -> Decimal {
        self.long_strike
    }

    /// Which side of the condor this spread is.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Net credit received, rounded to cents.
    #[must_use]
    pub const fn credit(&self) -> Decimal {
        self.credit
    }

    /// Absolute short-leg delta.
    #[must_use]
    pub const fn delta(&self) -> Decimal {
        self.delta
    }
}

//! Roll construction for a breached side.
//!
//! When the tested side of an open condor hits its loss or defensive
//! trigger, the roll engine scans later expirations for a replacement
//! condor: the tested side rebuilt at a target short-leg delta, the
//! untested side rebuilt two straddles out, both at the configured
//! spread width. The candidate whose net credit after closing the
//! current legs is highest wins; a strict comparison keeps the earliest
//! expiration on ties.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::chain::{ContractId, ContractPool, OptionQuote, OptionRight, listed_expirations};
use crate::config::{LifecycleConfig, SearchConfig};
use crate::error::ChainError;
use crate::lifecycle::Trade;
use crate::ports::{ComboLeg, ComboOrder};
use crate::spread::{Spread, initial_spread, spread_at_target_delta, straddle_price};

/// A fully-priced roll candidate for one later expiration.
#[derive(Debug, Clone)]
pub struct RollProposal {
    /// Side the roll was triggered on.
    pub side: OptionRight,
    /// Rebuilt tested-side spread at the new expiration.
    pub tested: Spread,
    /// Rebuilt untested-side spread at the new expiration.
    pub untested: Spread,
    /// Expiration of the new legs.
    pub expiry: NaiveDate,
    /// New combined credit minus the cost of closing the current legs.
    pub roll_credit: Decimal,
}

impl RollProposal {
    /// Eight-leg combo order executing the roll: close all four current
    /// legs, then open the four new ones.
    #[must_use]
    pub fn combo_order(&self, trade: &Trade) -> ComboOrder {
        let (tested_short, tested_long) = trade.side_legs(self.side);
        let (untested_short, untested_long) = trade.side_legs(self.side.opposite());
        ComboOrder::new(vec![
            ComboLeg::buy(tested_short.clone()),
            ComboLeg::sell(tested_long.clone()),
            ComboLeg::buy(untested_short.clone()),
            ComboLeg::sell(untested_long.clone()),
            ComboLeg::sell(self.tested.short_id().clone()),
            ComboLeg::buy(self.tested.long_id().clone()),
            ComboLeg::sell(self.untested.short_id().clone()),
            ComboLeg::buy(self.untested.long_id().clone()),
        ])
    }
}

/// Scans later expirations for the best-credit roll of a tested side.
#[derive(Debug, Clone)]
pub struct RollEngine {
    search: SearchConfig,
    lifecycle: LifecycleConfig,
}

impl RollEngine {
    /// Create a roll engine sharing the search and lifecycle parameters.
    #[must_use]
    pub const fn new(search: SearchConfig, lifecycle: LifecycleConfig) -> Self {
        Self { search, lifecycle }
    }

    /// Propose the best roll for `trade`'s tested `side`, if any.
    ///
    /// Candidate expirations are those listed in `chain` strictly after
    /// the trade's current expiry and within the roll horizon from
    /// `today`. Expirations whose pools fail to build or lack two
    /// contracts per side are skipped, as are those where either side
    /// cannot be rebuilt. Missing quotes for the trade's current legs
    /// are an error since the close cost cannot be priced without them.
    ///
    /// `Ok(None)` means no candidate expiration produced a roll.
    pub fn propose<F>(
        &self,
        trade: &Trade,
        side: OptionRight,
        chain: &[OptionQuote],
        spot: Decimal,
        today: NaiveDate,
        quote: F,
    ) -> Result<Option<RollProposal>, ChainError>
    where
        F: Fn(&ContractId) -> Option<OptionQuote>,
    {
        let close_cost = close_cost(trade, OptionRight::Call, &quote)?
            + close_cost(trade, OptionRight::Put, &quote)?;
        let horizon = today + Duration::days(self.lifecycle.roll_horizon_days);

        let mut best: Option<RollProposal> = None;
        for expiry in listed_expirations(chain) {
            if expiry <= trade.expiry || expiry > horizon {
                continue;
            }
            let Ok(pool) = ContractPool::from_snapshot(chain, expiry) else {
                debug!(expiry = %expiry, "skipping expiration with an empty side");
                continue;
            };
            if !pool.has_minimum_depth() {
                debug!(expiry = %expiry, "skipping expiration without spread depth");
                continue;
            }

            let Some(tested) = spread_at_target_delta(
                pool.side(side),
                self.lifecycle.roll_target_delta,
                self.search.spread_width,
            ) else {
                continue;
            };

            let straddle = straddle_price(&pool, spot);
            let untested_side = side.opposite();
            let Some(untested) = initial_spread(
                pool.side(untested_side),
                spot,
                straddle,
                untested_side,
                self.search.spread_width,
            ) else {
                continue;
            };

            let roll_credit = (tested.credit() + untested.credit() - close_cost).round_dp(2);
            debug!(
                expiry = %expiry,
                tested_strike = %tested.short_strike(),
                untested_strike = %untested.short_strike(),
                roll_credit = %roll_credit,
                "priced roll candidate"
            );

            let improves = best.as_ref().is_none_or(|b| roll_credit > b.roll_credit);
            if improves {
                best = Some(RollProposal {
                    side,
                    tested,
                    untested,
                    expiry,
                    roll_credit,
                });
            }
        }

        Ok(best)
    }
}

/// Cost of buying back one side at current quotes: short ask minus long
/// bid.
fn close_cost<F>(trade: &Trade, side: OptionRight, quote: &F) -> Result<Decimal, ChainError>
where
    F: Fn(&ContractId) -> Option<OptionQuote>,
{
    let (short_id, long_id) = trade.side_legs(side);
    let short = quote(short_id).ok_or_else(|| ChainError::MissingQuote(short_id.clone()))?;
    let long = quote(long_id).ok_or_else(|| ChainError::MissingQuote(long_id.clone()))?;
    Ok(short.ask - long.bid)
}

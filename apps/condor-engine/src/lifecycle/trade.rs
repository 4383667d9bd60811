//! The open-position aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::{ContractId, OptionQuote, OptionRight};
use crate::config::LifecycleConfig;
use crate::error::ChainError;
use crate::spread::Spread;

/// Lifecycle state of one side of the condor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SideState {
    /// Both legs open.
    Open,
    /// Closing order submitted, fill not yet confirmed.
    PendingClose,
    /// Closing fill confirmed.
    Closed,
}

impl SideState {
    /// Whether the side still carries live exposure for P&L purposes.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether a new closing order may be submitted for this side.
    #[must_use]
    pub const fn can_submit_close(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// One open four-leg iron condor position.
///
/// Created by a successful condor search, mutated in place by a
/// successful roll, and dropped on full exit. Exactly one `Trade` exists
/// per strategy instance and only the position manager mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Short call leg.
    pub short_call: ContractId,
    /// Long call leg.
    pub long_call: ContractId,
    /// Short put leg.
    pub short_put: ContractId,
    /// Long put leg.
    pub long_put: ContractId,

    /// Strike of the short call.
    pub short_call_strike: Decimal,
    /// Strike of the short put.
    pub short_put_strike: Decimal,

    /// Credit received on the call side at entry or last roll.
    pub call_credit: Decimal,
    /// Credit received on the put side at entry or last roll.
    pub put_credit: Decimal,
    /// Combined credit of the current four legs.
    pub entry_credit: Decimal,
    /// Total credit collected across entry and all rolls.
    pub cumulative_credit: Decimal,
    /// Exit when P&L reaches this (cumulative credit x target ratio).
    pub profit_target: Decimal,
    /// Roll or exit when P&L falls to this (negative).
    pub max_loss: Decimal,

    /// Expiration of the current legs.
    pub expiry: NaiveDate,
    /// Spot price when the position was entered.
    pub entry_spot: Decimal,

    /// Call side lifecycle state.
    pub call_side: SideState,
    /// Put side lifecycle state.
    pub put_side: SideState,
}

impl Trade {
    /// Open a trade from a qualifying spread pair.
    #[must_use]
    pub fn open(
        call: &Spread,
        put: &Spread,
        expiry: NaiveDate,
        spot: Decimal,
        config: &LifecycleConfig,
    ) -> Self {
        let entry_credit = (call.credit() + put.credit()).round_dp(2);
        Self {
            short_call: call.short_id().clone(),
            long_call: call.long_id().clone(),
            short_put: put.short_id().clone(),
            long_put: put.long_id().clone(),
            short_call_strike: call.short_strike(),
            short_put_strike: put.short_strike(),
            call_credit: call.credit(),
            put_credit: put.credit(),
            entry_credit,
            cumulative_credit: entry_credit,
            profit_target: entry_credit * config.profit_target_ratio,
            max_loss: entry_credit * config.max_loss_ratio,
            expiry,
            entry_spot: spot.round_dp(2),
            call_side: SideState::Open,
            put_side: SideState::Open,
        }
    }

    /// Replace all four legs after a roll.
    ///
    /// `side` names the tested side the roll rebuilt; the other spread
    /// becomes the untested side. Cumulative credit grows by the new
    /// combined credit and both thresholds are recomputed from it.
    /// Both sides reopen.
    pub fn apply_roll(
        &mut self,
        side: OptionRight,
        tested: &Spread,
        untested: &Spread,
        expiry: NaiveDate,
        config: &LifecycleConfig,
    ) {
        let (call, put) = match side {
            OptionRight::Call => (tested, untested),
            OptionRight::Put => (untested, tested),
        };
        self.short_call = call.short_id().clone();
        self.long_call = call.long_id().clone();
        self.short_put = put.short_id().clone();
        self.long_put = put.long_id().clone();
        self.short_call_strike = call.short_strike();
        self.short_put_strike = put.short_strike();
        self.call_credit = call.credit();
        self.put_credit = put.credit();
        self.entry_credit = (call.credit() + put.credit()).round_dp(2);
        self.cumulative_credit += self.entry_credit;
        self.profit_target = self.cumulative_credit * config.profit_target_ratio;
        self.max_loss = self.cumulative_credit * config.max_loss_ratio;
        self.expiry = expiry;
        self.call_side = SideState::Open;
        self.put_side = SideState::Open;
    }

    /// State of one side.
    #[must_use]
    pub const fn side_state(&self, side: OptionRight) -> SideState {
        match side {
            OptionRight::Call => self.call_side,
            OptionRight::Put => self.put_side,
        }
    }

    /// Set the state of one side.
    pub const fn set_side_state(&mut self, side: OptionRight, state: SideState) {
        match side {
            OptionRight::Call => self.call_side = state,
            OptionRight::Put => self.put_side = state,
        }
    }

    /// Short and long leg identifiers for one side.
    #[must_use]
    pub const fn side_legs(&self, side: OptionRight) -> (&ContractId, &ContractId) {
        match side {
            OptionRight::Call => (&self.short_call, &self.long_call),
            OptionRight::Put => (&self.short_put, &self.long_put),
        }
    }

    /// Whether `id` is one of the side's two legs.
    #[must_use]
    pub fn side_contains(&self, side: OptionRight, id: &ContractId) -> bool {
        let (short, long) = self.side_legs(side);
        short == id || long == id
    }

    /// The tested side: the one whose short strike sits closer to spot.
    ///
    /// Strict comparison, so an exact tie counts as the put side.
    #[must_use]
    pub fn tested_side(&self, spot: Decimal) -> OptionRight {
        let call_distance = self.short_call_strike - spot;
        let put_distance = spot - self.short_put_strike;
        if call_distance < put_distance {
            OptionRight::Call
        } else {
            OptionRight::Put
        }
    }

    /// Mark-to-market P&L across both sides.
    ///
    /// A closed side contributes its frozen credit; an open (or
    /// pending-close) side contributes credit minus the current cost of
    /// exiting it, with each leg marked at the bid/ask midpoint.
    pub fn open_pnl<F>(&self, quote: F) -> Result<Decimal, ChainError>
    where
        F: Fn(&ContractId) -> Option<OptionQuote>,
    {
        let call = self.side_pnl(OptionRight::Call, &quote)?;
        let put = self.side_pnl(OptionRight::Put, &quote)?;
        Ok(call + put)
    }

    fn side_pnl<F>(&self, side: OptionRight, quote: &F) -> Result<Decimal, ChainError>
    where
        F: Fn(&ContractId) -> Option<OptionQuote>,
    {
        let credit = match side {
            OptionRight::Call => self.call_credit,
            OptionRight::Put => self.put_credit,
        };
        if self.side_state(side).is_closed() {
            return Ok(credit);
        }
        let (short_id, long_id) = self.side_legs(side);
        let short = quote(short_id).ok_or_else(|| ChainError::MissingQuote(short_id.clone()))?;
        let long = quote(long_id).ok_or_else(|| ChainError::MissingQuote(long_id.clone()))?;
        let exit_cost = short.mid() - long.mid();
        Ok(credit - exit_cost)
    }

    /// Whether the current legs expire on `date`.
    #[must_use]
    pub fn is_expiry_day(&self, date: NaiveDate) -> bool {
        self.expiry == date
    }
}

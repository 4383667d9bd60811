//! Position lifecycle management.
//!
//! [`PositionManager`] is the tick-driven core: the harness calls
//! [`check_entry`] once per entry window tick, [`monitor`] on every
//! monitoring tick, and [`on_order_event`] for each fill report. All
//! order submission is optimistic and fire-and-forget; side states move
//! to `PendingClose` at submission time and to `Closed` only when a
//! matching fill event arrives.
//!
//! [`check_entry`]: PositionManager::check_entry
//! [`monitor`]: PositionManager::monitor
//! [`on_order_event`]: PositionManager::on_order_event

mod trade;

pub use trade::{SideState, Trade};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::chain::{ContractPool, OptionRight, listed_expirations};
use crate::config::{LifecycleConfig, SearchConfig};
use crate::error::ChainError;
use crate::ports::{
    ComboLeg, ComboOrder, MarketDataPort, OrderEvent, OrderGatewayPort, OrderStatus, RegimePort,
};
use crate::roll::RollEngine;
use crate::search::CondorSearch;

/// Result of one entry-window tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A position is already open.
    AlreadyInPosition,
    /// The regime gate disallowed entries this tick.
    RegimeBlocked,
    /// The entry window's search budget is spent.
    AttemptsExhausted,
    /// No qualifying condor was found on this snapshot.
    NoCandidate,
    /// A condor was found and its entry order submitted.
    Entered,
}

/// Result of one monitoring tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Nothing to monitor.
    NoPosition,
    /// No threshold hit; position unchanged.
    Hold,
    /// Profit target reached, full exit submitted.
    ProfitTarget,
    /// Max loss hit and the tested side was rolled.
    MaxLossRolled(OptionRight),
    /// Max loss hit and no roll was available; full exit submitted.
    MaxLossExit,
    /// Expiry-day tactics fired, in evaluation order.
    ExpiryTactics(Vec<TacticAction>),
}

/// One expiry-day tactical action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticAction {
    /// A side's buyback cost dropped under the threshold and its closing
    /// order was submitted.
    CheapBuyback(OptionRight),
    /// A side's short delta breached the defensive threshold and the
    /// position was rolled for that side.
    DefensiveRoll(OptionRight),
}

/// Tick-driven manager of a single condor position.
#[derive(Debug)]
pub struct PositionManager {
    search: CondorSearch,
    roll: RollEngine,
    config: LifecycleConfig,
    trade: Option<Trade>,
    entry_attempts: u32,
}

impl PositionManager {
    /// Create a manager with the given search and lifecycle parameters.
    #[must_use]
    pub fn new(search: SearchConfig, lifecycle: LifecycleConfig) -> Self {
        Self {
            search: CondorSearch::new(search.clone()),
            roll: RollEngine::new(search, lifecycle.clone()),
            config: lifecycle,
            trade: None,
            entry_attempts: 0,
        }
    }

    /// The open trade, if any.
    #[must_use]
    pub const fn trade(&self) -> Option<&Trade> {
        self.trade.as_ref()
    }

    /// Whether a position is currently open.
    #[must_use]
    pub const fn in_position(&self) -> bool {
        self.trade.is_some()
    }

    /// Reset the per-window search attempt counter. The harness calls
    /// this at the start of each entry window.
    pub const fn begin_entry_window(&mut self) {
        self.entry_attempts = 0;
    }

    /// Run one entry attempt against the current snapshot.
    ///
    /// Searches the nearest expiration strictly after `today`. A failed
    /// search burns one of the window's attempts; regime blocks and
    /// missing chains do not.
    pub fn check_entry<M, R, G>(
        &mut self,
        today: NaiveDate,
        market: &M,
        regime: &R,
        gateway: &mut G,
    ) -> Result<EntryOutcome, ChainError>
    where
        M: MarketDataPort,
        R: RegimePort,
        G: OrderGatewayPort,
    {
        if self.trade.is_some() {
            return Ok(EntryOutcome::AlreadyInPosition);
        }
        if !regime.entry_allowed() {
            debug!("entry blocked by regime gate");
            return Ok(EntryOutcome::RegimeBlocked);
        }
        if self.entry_attempts >= self.config.max_search_attempts {
            debug!(
                attempts = self.entry_attempts,
                "entry window search budget spent"
            );
            return Ok(EntryOutcome::AttemptsExhausted);
        }

        let chain = market.chain();
        let Some(expiry) = listed_expirations(&chain).into_iter().find(|e| *e > today) else {
            debug!("no expiration after today in the chain");
            return Ok(EntryOutcome::NoCandidate);
        };
        let pool = ContractPool::from_snapshot(&chain, expiry)?;
        let spot = market.spot();

        let Some(fit) = self.search.find(&pool, spot) else {
            self.entry_attempts += 1;
            debug!(
                attempt = self.entry_attempts,
                expiry = %expiry,
                "no qualifying condor on this snapshot"
            );
            return Ok(EntryOutcome::NoCandidate);
        };

        let trade = Trade::open(&fit.call, &fit.put, expiry, spot, &self.config);
        info!(
            spot = %trade.entry_spot,
            call_short = %fit.call.short_strike(),
            call_long = %fit.call.long_strike(),
            put_short = %fit.put.short_strike(),
            put_long = %fit.put.long_strike(),
            credit = %trade.entry_credit,
            tweak_count = fit.tweak_count,
            "entering condor"
        );

        gateway.submit_combo(&ComboOrder::new(vec![
            ComboLeg::buy(trade.long_put.clone()),
            ComboLeg::sell(trade.short_put.clone()),
            ComboLeg::sell(trade.short_call.clone()),
            ComboLeg::buy(trade.long_call.clone()),
        ]));
        self.trade = Some(trade);
        Ok(EntryOutcome::Entered)
    }

    /// Run one monitoring tick.
    ///
    /// Evaluation order: expiry-day quiet hours, profit target, max loss
    /// (roll, else exit), then expiry-day tactics.
    pub fn monitor<M, G>(
        &mut self,
        now: NaiveDateTime,
        market: &M,
        gateway: &mut G,
    ) -> Result<MonitorOutcome, ChainError>
    where
        M: MarketDataPort,
        G: OrderGatewayPort,
    {
        let Some(mut trade) = self.trade.take() else {
            return Ok(MonitorOutcome::NoPosition);
        };

        let outcome = self.monitor_open(&mut trade, now, market, gateway);
        match outcome {
            // Full exits drop the trade; everything else keeps it.
            Ok(MonitorOutcome::ProfitTarget | MonitorOutcome::MaxLossExit) => {}
            _ => self.trade = Some(trade),
        }
        outcome
    }

    fn monitor_open<M, G>(
        &self,
        trade: &mut Trade,
        now: NaiveDateTime,
        market: &M,
        gateway: &mut G,
    ) -> Result<MonitorOutcome, ChainError>
    where
        M: MarketDataPort,
        G: OrderGatewayPort,
    {
        let today = now.date();
        let expiry_day = trade.is_expiry_day(today);
        if expiry_day && now.hour() < self.config.expiry_monitor_start_hour {
            return Ok(MonitorOutcome::Hold);
        }

        let pnl = trade.open_pnl(|id| market.quote(id))?;

        if pnl >= trade.profit_target {
            info!(pnl = %pnl, target = %trade.profit_target, "profit target reached, exiting");
            submit_full_exit(trade, gateway);
            return Ok(MonitorOutcome::ProfitTarget);
        }

        if pnl <= trade.max_loss {
            let spot = market.spot();
            let side = trade.tested_side(spot);
            let chain = market.chain();
            let proposal =
                self.roll
                    .propose(trade, side, &chain, spot, today, |id| market.quote(id))?;
            return match proposal {
                Some(proposal) => {
                    info!(
                        side = %side,
                        expiry = %proposal.expiry,
                        roll_credit = %proposal.roll_credit,
                        "max loss hit, rolling tested side"
                    );
                    gateway.submit_combo(&proposal.combo_order(trade));
                    trade.apply_roll(
                        side,
                        &proposal.tested,
                        &proposal.untested,
                        proposal.expiry,
                        &self.config,
                    );
                    Ok(MonitorOutcome::MaxLossRolled(side))
                }
                None => {
                    info!(pnl = %pnl, "max loss hit and no roll available, exiting");
                    submit_full_exit(trade, gateway);
                    Ok(MonitorOutcome::MaxLossExit)
                }
            };
        }

        if expiry_day {
            return self.expiry_tactics(trade, today, market, gateway);
        }

        Ok(MonitorOutcome::Hold)
    }

    /// Expiry-day tactics: cheap buybacks on both sides first, then
    /// defensive rolls. A side with a pending or confirmed close is
    /// never acted on again.
    fn expiry_tactics<M, G>(
        &self,
        trade: &mut Trade,
        today: NaiveDate,
        market: &M,
        gateway: &mut G,
    ) -> Result<MonitorOutcome, ChainError>
    where
        M: MarketDataPort,
        G: OrderGatewayPort,
    {
        let mut actions = Vec::new();

        for side in [OptionRight::Call, OptionRight::Put] {
            if !trade.side_state(side).can_submit_close() {
                continue;
            }
            let Some(cost) = buyback_cost(trade, side, market) else {
                continue;
            };
            if cost <= self.config.cheap_buyback_threshold {
                info!(side = %side, cost = %cost, "cheap buyback, closing side");
                submit_side_exit(trade, side, gateway);
                actions.push(TacticAction::CheapBuyback(side));
            }
        }

        for side in [OptionRight::Call, OptionRight::Put] {
            if !trade.side_state(side).can_submit_close() {
                continue;
            }
            let (short_id, _) = trade.side_legs(side);
            let delta = market.quote(short_id).map_or(Decimal::ZERO, |q| q.delta);
            if delta <= self.config.defensive_delta_threshold {
                continue;
            }

            info!(side = %side, delta = %delta, "short delta breached, rolling side");
            submit_side_exit(trade, side.opposite(), gateway);
            let spot = market.spot();
            let chain = market.chain();
            let proposal =
                self.roll
                    .propose(trade, side, &chain, spot, today, |id| market.quote(id))?;
            if let Some(proposal) = proposal {
                gateway.submit_combo(&proposal.combo_order(trade));
                trade.apply_roll(
                    side,
                    &proposal.tested,
                    &proposal.untested,
                    proposal.expiry,
                    &self.config,
                );
                actions.push(TacticAction::DefensiveRoll(side));
            }
        }

        if actions.is_empty() {
            Ok(MonitorOutcome::Hold)
        } else {
            Ok(MonitorOutcome::ExpiryTactics(actions))
        }
    }

    /// Reconcile a fill event against any pending side close.
    pub fn on_order_event(&mut self, event: &OrderEvent) {
        if event.status != OrderStatus::Filled {
            return;
        }
        debug!(
            contract = %event.id,
            quantity = event.quantity,
            fill_price = %event.fill_price,
            "order filled"
        );
        let Some(trade) = self.trade.as_mut() else {
            return;
        };
        for side in [OptionRight::Call, OptionRight::Put] {
            if trade.side_state(side) == SideState::PendingClose
                && trade.side_contains(side, &event.id)
            {
                info!(side = %side, "side closure filled");
                trade.set_side_state(side, SideState::Closed);
            }
        }
    }
}

/// Net cost of buying a side back right now: short bid minus long ask.
/// `None` when either leg is no longer quoted.
fn buyback_cost<M: MarketDataPort>(
    trade: &Trade,
    side: OptionRight,
    market: &M,
) -> Option<Decimal> {
    let (short_id, long_id) = trade.side_legs(side);
    let short = market.quote(short_id)?;
    let long = market.quote(long_id)?;
    Some(short.bid - long.ask)
}

/// Submit the closing combo for every side not yet confirmed closed,
/// put legs first. Pending-close sides are re-included; a duplicate
/// close beats a leg left open.
fn submit_full_exit<G: OrderGatewayPort>(trade: &mut Trade, gateway: &mut G) {
    let mut legs = Vec::new();
    if !trade.put_side.is_closed() {
        legs.push(ComboLeg::sell(trade.long_put.clone()));
        legs.push(ComboLeg::buy(trade.short_put.clone()));
    }
    if !trade.call_side.is_closed() {
        legs.push(ComboLeg::buy(trade.short_call.clone()));
        legs.push(ComboLeg::sell(trade.long_call.clone()));
    }
    if !legs.is_empty() {
        gateway.submit_combo(&ComboOrder::new(legs));
    }
}

/// Submit a two-leg closing combo for one side and mark it pending.
/// No-op unless the side is fully open.
fn submit_side_exit<G: OrderGatewayPort>(trade: &mut Trade, side: OptionRight, gateway: &mut G) {
    if !trade.side_state(side).can_submit_close() {
        return;
    }
    let (short_id, long_id) = trade.side_legs(side);
    gateway.submit_combo(&ComboOrder::new(vec![
        ComboLeg::buy(short_id.clone()),
        ComboLeg::sell(long_id.clone()),
    ]));
    trade.set_side_state(side, SideState::PendingClose);
}

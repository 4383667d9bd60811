//! End-to-end lifecycle tests: entry, max-loss roll, profit-target
//! exit, and expiry-day tactics against stubbed harness ports.

use chrono::{NaiveDate, NaiveDateTime};
use condor_engine::{
    ComboOrder, ContractId, EntryOutcome, LifecycleConfig, MarketDataPort, MonitorOutcome,
    OptionQuote, OptionRight, OrderGatewayPort, PositionManager, RegimePort, SearchConfig,
    SideState, TacticAction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, 0, 0).unwrap()
}

fn quote(
    id: &str,
    right: OptionRight,
    strike: Decimal,
    bid: Decimal,
    ask: Decimal,
    delta: Decimal,
    expiration: NaiveDate,
) -> OptionQuote {
    OptionQuote::new(id, right, strike, bid, ask, delta, expiration)
}

/// Chain expiring 3/15 whose 2-sigma spreads qualify under a widened
/// credit band: call 5130/5150 and put 4970/4950, 0.32 credit per side.
fn entry_chain() -> Vec<OptionQuote> {
    let e = date(15);
    vec![
        quote("C5050", OptionRight::Call, dec!(5050), dec!(20.00), dec!(20.40), dec!(0.50), e),
        quote("P5050", OptionRight::Put, dec!(5050), dec!(19.50), dec!(19.90), dec!(0.50), e),
        quote("C5130", OptionRight::Call, dec!(5130), dec!(0.70), dec!(0.80), dec!(0.045), e),
        quote("C5150", OptionRight::Call, dec!(5150), dec!(0.28), dec!(0.38), dec!(0.025), e),
        quote("P4970", OptionRight::Put, dec!(4970), dec!(0.70), dec!(0.80), dec!(0.055), e),
        quote("P4950", OptionRight::Put, dec!(4950), dec!(0.28), dec!(0.38), dec!(0.030), e),
    ]
}

/// Roll ladder expiring 3/18, sized for spot 5125: the call side
/// rebuilds at 5250/5270 (0.50 credit, delta 0.18 under the 0.20
/// target) and the put side two straddles down at 5045/5025 (0.60
/// credit). Straddle: 20.40 + 19.60 rounds to 40.
fn roll_chain() -> Vec<OptionQuote> {
    let e = date(18);
    vec![
        quote("C5150r", OptionRight::Call, dec!(5150), dec!(20.00), dec!(20.40), dec!(0.35), e),
        quote("C5250r", OptionRight::Call, dec!(5250), dec!(2.50), dec!(2.60), dec!(0.18), e),
        quote("C5270r", OptionRight::Call, dec!(5270), dec!(1.90), dec!(2.00), dec!(0.12), e),
        quote("P5100r", OptionRight::Put, dec!(5100), dec!(19.20), dec!(19.60), dec!(0.40), e),
        quote("P5045r", OptionRight::Put, dec!(5045), dec!(1.50), dec!(1.60), dec!(0.15), e),
        quote("P5025r", OptionRight::Put, dec!(5025), dec!(0.80), dec!(0.90), dec!(0.10), e),
    ]
}

fn search_config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.min_credit = dec!(0.50);
    config.max_credit = dec!(0.80);
    config
}

struct StubMarket {
    spot: Decimal,
    chain: Vec<OptionQuote>,
    quotes: Vec<OptionQuote>,
}

impl MarketDataPort for StubMarket {
    fn spot(&self) -> Decimal {
        self.spot
    }

    fn chain(&self) -> Vec<OptionQuote> {
        self.chain.clone()
    }

    fn quote(&self, id: &ContractId) -> Option<OptionQuote> {
        self.quotes
            .iter()
            .chain(self.chain.iter())
            .find(|q| &q.id == id)
            .cloned()
    }
}

struct Gate(bool);

impl RegimePort for Gate {
    fn entry_allowed(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
struct RecordingGateway {
    orders: Vec<ComboOrder>,
}

impl OrderGatewayPort for RecordingGateway {
    fn submit_combo(&mut self, order: &ComboOrder) {
        self.orders.push(order.clone());
    }
}

fn legs(order: &ComboOrder) -> Vec<(&str, i32)> {
    order.legs.iter().map(|l| (l.id.as_str(), l.quantity)).collect()
}

fn enter(manager: &mut PositionManager, gateway: &mut RecordingGateway) {
    let market = StubMarket {
        spot: dec!(5050),
        chain: entry_chain(),
        quotes: Vec::new(),
    };
    let outcome = manager
        .check_entry(date(14), &market, &Gate(true), gateway)
        .unwrap();
    assert_eq!(outcome, EntryOutcome::Entered);
}

#[test]
fn max_loss_roll_then_profit_target_exit() {
    let mut gateway = RecordingGateway::default();
    let mut manager = PositionManager::new(search_config(), LifecycleConfig::default());
    enter(&mut manager, &mut gateway);
    assert_eq!(manager.trade().unwrap().cumulative_credit, dec!(0.64));

    // Spot rallies into the call side. Marks put the position at
    // 0.32 - 3.00 + 0.32 = -2.36, through the -2.24 floor, and the
    // 3/18 ladder offers a roll.
    let e0 = date(15);
    let market = StubMarket {
        spot: dec!(5125),
        chain: roll_chain(),
        quotes: vec![
            quote("C5130", OptionRight::Call, dec!(5130), dec!(4.95), dec!(5.05), dec!(0.55), e0),
            quote("C5150", OptionRight::Call, dec!(5150), dec!(1.95), dec!(2.05), dec!(0.30), e0),
            quote("P4970", OptionRight::Put, dec!(4970), dec!(0.05), dec!(0.15), dec!(0.01), e0),
            quote("P4950", OptionRight::Put, dec!(4950), dec!(0.05), dec!(0.15), dec!(0.01), e0),
        ],
    };
    let outcome = manager.monitor(at(14, 12), &market, &mut gateway).unwrap();
    assert_eq!(outcome, MonitorOutcome::MaxLossRolled(OptionRight::Call));

    // Eight legs: close the old condor, open the new one.
    assert_eq!(
        legs(&gateway.orders[1]),
        vec![
            ("C5130", 1),
            ("C5150", -1),
            ("P4970", 1),
            ("P4950", -1),
            ("C5250r", -1),
            ("C5270r", 1),
            ("P5045r", -1),
            ("P5025r", 1),
        ]
    );

    let trade = manager.trade().unwrap();
    assert_eq!(trade.expiry, date(18));
    assert_eq!(trade.entry_credit, dec!(1.10));
    assert_eq!(trade.cumulative_credit, dec!(1.74));
    assert_eq!(trade.call_side, SideState::Open);
    assert_eq!(trade.put_side, SideState::Open);

    // The rolled legs decay to pennies: P&L 1.10 clears the 1.044
    // target and the whole position exits, put legs first.
    let e1 = date(18);
    let market = StubMarket {
        spot: dec!(5140),
        chain: Vec::new(),
        quotes: vec![
            quote("C5250r", OptionRight::Call, dec!(5250), dec!(0.01), dec!(0.03), dec!(0.02), e1),
            quote("C5270r", OptionRight::Call, dec!(5270), dec!(0.01), dec!(0.03), dec!(0.01), e1),
            quote("P5045r", OptionRight::Put, dec!(5045), dec!(0.01), dec!(0.03), dec!(0.02), e1),
            quote("P5025r", OptionRight::Put, dec!(5025), dec!(0.01), dec!(0.03), dec!(0.01), e1),
        ],
    };
    let outcome = manager.monitor(at(16, 10), &market, &mut gateway).unwrap();

    assert_eq!(outcome, MonitorOutcome::ProfitTarget);
    assert!(!manager.in_position());
    assert_eq!(
        legs(&gateway.orders[2]),
        vec![("P5025r", -1), ("P5045r", 1), ("C5250r", 1), ("C5270r", -1)]
    );

    // A fresh window can enter again.
    manager.begin_entry_window();
    enter(&mut manager, &mut gateway);
}

#[test]
fn expiry_day_buyback_and_defensive_roll() {
    let mut gateway = RecordingGateway::default();
    let mut manager = PositionManager::new(search_config(), LifecycleConfig::default());
    enter(&mut manager, &mut gateway);

    // 3/15 is expiry day. The put side is nearly worthless (buyback
    // 0.06 - 0.03 = 0.03) while the short call has run to 0.35 delta.
    // P&L -0.68 + 0.26 = -0.42 stays inside both thresholds.
    let e0 = date(15);
    let market = StubMarket {
        spot: dec!(5125),
        chain: roll_chain(),
        quotes: vec![
            quote("C5130", OptionRight::Call, dec!(5130), dec!(1.40), dec!(1.50), dec!(0.35), e0),
            quote("C5150", OptionRight::Call, dec!(5150), dec!(0.40), dec!(0.50), dec!(0.20), e0),
            quote("P4970", OptionRight::Put, dec!(4970), dec!(0.06), dec!(0.10), dec!(0.01), e0),
            quote("P4950", OptionRight::Put, dec!(4950), dec!(0.01), dec!(0.03), dec!(0.01), e0),
        ],
    };
    let outcome = manager.monitor(at(15, 10), &market, &mut gateway).unwrap();

    assert_eq!(
        outcome,
        MonitorOutcome::ExpiryTactics(vec![
            TacticAction::CheapBuyback(OptionRight::Put),
            TacticAction::DefensiveRoll(OptionRight::Call),
        ])
    );

    // Order 1: the put buyback. Order 2: the eight-leg defensive roll.
    assert_eq!(legs(&gateway.orders[1]), vec![("P4970", 1), ("P4950", -1)]);
    assert_eq!(gateway.orders[2].legs.len(), 8);
    assert_eq!(gateway.orders.len(), 3);

    // The roll replaced every leg and reopened both sides.
    let trade = manager.trade().unwrap();
    assert_eq!(trade.expiry, date(18));
    assert_eq!(trade.cumulative_credit, dec!(1.74));
    assert_eq!(trade.short_call, ContractId::new("C5250r"));
    assert_eq!(trade.short_put, ContractId::new("P5045r"));
    assert_eq!(trade.call_side, SideState::Open);
    assert_eq!(trade.put_side, SideState::Open);
}

#[test]
fn quiet_hours_defer_expiry_day_monitoring() {
    let mut gateway = RecordingGateway::default();
    let mut manager = PositionManager::new(search_config(), LifecycleConfig::default());
    enter(&mut manager, &mut gateway);

    let market = StubMarket {
        spot: dec!(5050),
        chain: Vec::new(),
        quotes: Vec::new(),
    };
    let outcome = manager.monitor(at(15, 8), &market, &mut gateway).unwrap();

    assert_eq!(outcome, MonitorOutcome::Hold);
    assert_eq!(gateway.orders.len(), 1);
}

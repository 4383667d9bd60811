// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::items_after_statements
    )
)]

//! Condor Engine - Rust Core Library
//!
//! Iron condor spread search and position lifecycle engine.
//!
//! Given a snapshot of an options chain and the underlying spot price,
//! the engine decides whether a balanced four-leg iron condor exists that
//! satisfies a set of credit, delta, and symmetry constraints. Once a
//! position is open, it manages the trade's lifecycle: profit taking,
//! loss limiting, cheap expiry-day buybacks, and tactical rolls of a
//! tested side to a later expiration for additional credit.
//!
//! # Architecture
//!
//! - `chain`: contract pool adapter - ordered candidate lists per side
//! - `spread`: spread builder and ATM straddle / target-strike estimator
//! - `search`: the iterative condor tweak engine (seven ordered checks)
//! - `lifecycle`: the `Trade` aggregate and tick-driven position manager
//! - `roll`: best-expiry roll construction for a tested side
//! - `ports`: synchronous interfaces to the execution harness
//!
//! The core is single-threaded and tick-driven: the harness invokes
//! [`PositionManager`] handlers once per scheduled tick and each handler
//! runs to completion. Order submission is fire-and-forget; fills are
//! reconciled later through [`PositionManager::on_order_event`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Contract pool adapter - candidate contracts for one expiration.
pub mod chain;

/// Search and lifecycle configuration parameters.
pub mod config;

/// Boundary precondition errors.
pub mod error;

/// Position lifecycle management.
pub mod lifecycle;

/// Harness-facing ports and order types.
pub mod ports;

/// Market regime helpers.
pub mod regime;

/// Roll engine - tested-side roll construction.
pub mod roll;

/// Condor search engine.
pub mod search;

/// Spread building and straddle estimation.
pub mod spread;

/// Tracing subscriber setup for embedding harnesses.
pub mod telemetry;

pub use chain::{ContractId, ContractPool, OptionQuote, OptionRight};
pub use config::{LifecycleConfig, SearchConfig};
pub use error::ChainError;
pub use lifecycle::{EntryOutcome, MonitorOutcome, PositionManager, SideState, TacticAction, Trade};
pub use ports::{
    ComboLeg, ComboOrder, MarketDataPort, OrderEvent, OrderGatewayPort, OrderStatus, RegimePort,
};
pub use regime::TermStructure;
pub use roll::{RollEngine, RollProposal};
pub use search::{CondorFit, CondorSearch};
pub use spread::Spread;

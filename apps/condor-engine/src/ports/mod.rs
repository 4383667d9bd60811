//! Harness-facing ports.
//!
//! The engine is a library invoked in-process by a backtest or live
//! execution harness. Everything it needs from the outside world comes
//! through these traits; everything it pushes out goes through the
//! order gateway. All ports are synchronous: the core is tick-driven
//! and single-threaded, and any waiting lives in the harness.

mod market_data;
mod orders;

pub use market_data::{MarketDataPort, RegimePort};
pub use orders::{ComboLeg, ComboOrder, OrderEvent, OrderGatewayPort, OrderStatus};

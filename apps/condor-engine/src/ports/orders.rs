//! Multi-leg order submission and fill events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::ContractId;

/// One leg of a combo order: a contract and a signed per-combo quantity
/// (+1 buy, -1 sell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboLeg {
    /// Contract to trade.
    pub id: ContractId,
    /// Signed quantity per combo unit.
    pub quantity: i32,
}

impl ComboLeg {
    /// Buy one contract per combo unit.
    #[must_use]
    pub fn buy(id: ContractId) -> Self {
        Self { id, quantity: 1 }
    }

    /// Sell one contract per combo unit.
    #[must_use]
    pub fn sell(id: ContractId) -> Self {
        Self { id, quantity: -1 }
    }
}

/// A multi-leg order submitted as one atomic combo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboOrder {
    /// Legs in submission order.
    pub legs: Vec<ComboLeg>,
    /// Number of combo units.
    pub quantity: u32,
}

impl ComboOrder {
    /// Create a single-unit combo order.
    #[must_use]
    pub const fn new(legs: Vec<ComboLeg>) -> Self {
        Self { legs, quantity: 1 }
    }
}

/// Fill status reported back by the execution collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Leg fully filled.
    Filled,
    /// Leg partially filled.
    PartiallyFilled,
    /// Order canceled by the venue or harness.
    Canceled,
    /// Order rejected.
    Rejected,
}

/// Per-leg fill event delivered asynchronously after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Contract the event refers to.
    pub id: ContractId,
    /// Fill status.
    pub status: OrderStatus,
    /// Fill price.
    pub fill_price: Decimal,
    /// Signed filled quantity.
    pub quantity: i32,
}

/// Order submission port (driven port).
///
/// Submission is fire-and-forget: the engine updates its own state
/// optimistically at submission time and reconciles against
/// [`OrderEvent`]s later. There is no cancellation path.
pub trait OrderGatewayPort {
    /// Submit a multi-leg combo order.
    fn submit_combo(&mut self, order: &ComboOrder);
}

//! Option quote snapshot value objects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionRight {
    /// The other side of the condor.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Call => Self::Put,
            Self::Put => Self::Call,
        }
    }
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Opaque contract identifier assigned by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Create a new contract identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContractId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContractId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Immutable snapshot of one option contract.
///
/// Owned by the harness and re-read by identifier every tick; the core
/// never caches quotes across ticks. Delta arrives pre-computed and is
/// stored as an absolute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Contract identifier.
    pub id: ContractId,
    /// Call or put.
    pub right: OptionRight,
    /// Strike price.
    pub strike: Decimal,
    /// Current bid.
    pub bid: Decimal,
    /// Current ask.
    pub ask: Decimal,
    /// Absolute delta of the contract.
    pub delta: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
}

impl OptionQuote {
    /// Create a new quote snapshot. Delta is stored as an absolute value.
    #[must_use]
    pub fn new(
        id: impl Into<ContractId>,
        right: OptionRight,
        strike: Decimal,
        bid: Decimal,
        ask: Decimal,
        delta: Decimal,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            right,
            strike,
            bid,
            ask,
            delta: delta.abs(),
            expiration,
        }
    }

    /// Bid/ask midpoint, used to mark open legs for P&L.
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}

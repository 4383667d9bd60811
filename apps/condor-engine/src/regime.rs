//! Volatility term-structure regime gate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::RegimePort;

/// A three-point volatility term structure snapshot.
///
/// Entries are allowed only in contango, when near-dated implied
/// volatility sits under longer-dated: `1d < 9d < 30d`. Missing or
/// non-positive readings fail closed and block entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStructure {
    /// 1-day implied volatility index level.
    pub vix_1d: Decimal,
    /// 9-day implied volatility index level.
    pub vix_9d: Decimal,
    /// 30-day implied volatility index level.
    pub vix_30d: Decimal,
}

impl TermStructure {
    /// Create a snapshot from the three index levels.
    #[must_use]
    pub const fn new(vix_1d: Decimal, vix_9d: Decimal, vix_30d: Decimal) -> Self {
        Self {
            vix_1d,
            vix_9d,
            vix_30d,
        }
    }

    /// Whether the structure is in contango.
    #[must_use]
    pub fn is_contango(&self) -> bool {
        if self.vix_1d <= Decimal::ZERO
            || self.vix_9d <= Decimal::ZERO
            || self.vix_30d <= Decimal::ZERO
        {
            debug!(
                vix_1d = %self.vix_1d,
                vix_9d = %self.vix_9d,
                vix_30d = %self.vix_30d,
                "invalid term structure reading"
            );
            return false;
        }
        self.vix_1d < self.vix_9d && self.vix_9d < self.vix_30d
    }

    /// Spread between the 9-day and 1-day points.
    #[must_use]
    pub fn spread_1d_9d(&self) -> Decimal {
        self.vix_9d - self.vix_1d
    }

    /// Spread between the 30-day and 9-day points.
    #[must_use]
    pub fn spread_9d_30d(&self) -> Decimal {
        self.vix_30d - self.vix_9d
    }

    /// Spread across the whole curve.
    #[must_use]
    pub fn spread_1d_30d(&self) -> Decimal {
        self.vix_30d - self.vix_1d
    }
}

impl RegimePort for TermStructure {
    fn entry_allowed(&self) -> bool {
        self.is_contango()
    }
}

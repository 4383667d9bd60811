//! Market data and regime ports (driven ports).

use rust_decimal::Decimal;

use crate::chain::{ContractId, OptionQuote};

/// Per-tick market data supplied by the harness.
///
/// Quotes are re-read by identifier every tick; the engine caches
/// nothing across ticks. Present Greeks and non-empty chains are the
/// harness's documented preconditions.
pub trait MarketDataPort {
    /// Current underlying spot price.
    fn spot(&self) -> Decimal;

    /// Current option chain snapshot across all listed expirations.
    fn chain(&self) -> Vec<OptionQuote>;

    /// Current quote for one contract, if the harness still lists it.
    fn quote(&self, id: &ContractId) -> Option<OptionQuote>;
}

/// Opaque market-regime gate for entries.
///
/// The engine never inspects why entries are blocked; a term-structure
/// check such as [`TermStructure`] is one implementation.
///
/// [`TermStructure`]: crate::regime::TermStructure
pub trait RegimePort {
    /// Whether new entries are allowed this tick.
    fn entry_allowed(&self) -> bool;
}

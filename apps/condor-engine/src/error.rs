//! Boundary precondition errors.
//!
//! Ordinary "absence" outcomes - no candidate spread, search budget
//! exhausted, no viable roll expiration - are `Option::None` throughout
//! the crate, never errors. The error type here covers the one class of
//! condition the harness must guarantee away: market data missing for a
//! contract the engine was asked to evaluate. A `ChainError` terminates
//! the current tick's attempt, not the process.

use chrono::NaiveDate;
use thiserror::Error;

use crate::chain::ContractId;

/// Precondition violations at the market-data boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A candidate side has no listed contracts for the expiration.
    #[error("no {side} contracts listed for expiration {expiration}")]
    EmptySide {
        /// Side with no contracts ("call" or "put").
        side: &'static str,
        /// Expiration that was requested.
        expiration: NaiveDate,
    },

    /// No current quote for a contract referenced by the open trade.
    #[error("no quote available for contract {0}")]
    MissingQuote(ContractId),
}

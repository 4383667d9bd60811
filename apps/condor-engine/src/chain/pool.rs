//! Candidate contract pool for one expiration.

use chrono::NaiveDate;

use super::{OptionQuote, OptionRight};
use crate::error::ChainError;

/// Ordered candidate lists for one expiration.
///
/// Calls are sorted ascending by strike and puts descending, so both
/// lists scan from nearest-the-money outward. Construction fails when a
/// side is empty; non-empty lists are a documented precondition for the
/// straddle estimator and the search engine.
#[derive(Debug, Clone)]
pub struct ContractPool {
    expiration: NaiveDate,
    calls: Vec<OptionQuote>,
    puts: Vec<OptionQuote>,
}

impl ContractPool {
    /// Build a pool from a chain snapshot, keeping only `expiration`.
    pub fn from_snapshot(
        quotes: &[OptionQuote],
        expiration: NaiveDate,
    ) -> Result<Self, ChainError> {
        let mut calls: Vec<OptionQuote> = quotes
            .iter()
            .filter(|q| q.expiration == expiration && q.right == OptionRight::Call)
            .cloned()
            .collect();
        let mut puts: Vec<OptionQuote> = quotes
            .iter()
            .filter(|q| q.expiration == expiration && q.right == OptionRight::Put)
            .cloned()
            .collect();

        if calls.is_empty() {
            return Err(ChainError::EmptySide {
                side: "call",
                expiration,
            });
        }
        if puts.is_empty() {
            return Err(ChainError::EmptySide {
                side: "put",
                expiration,
            });
        }

        calls.sort_by(|a, b| a.strike.cmp(&b.strike));
        puts.sort_by(|a, b| b.strike.cmp(&a.strike));

        Ok(Self {
            expiration,
            calls,
            puts,
        })
    }

    /// Expiration this pool was built for.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Call candidates, ascending by strike.
    #[must_use]
    pub fn calls(&self) -> &[OptionQuote] {
        &self.calls
    }

    /// Put candidates, descending by strike.
    #[must_use]
    pub fn puts(&self) -> &[OptionQuote] {
        &self.puts
    }

    /// Candidates for one side.
    #[must_use]
    pub fn side(&self, right: OptionRight) -> &[OptionQuote] {
        match right {
            OptionRight::Call => &self.calls,
            OptionRight::Put => &self.puts,
        }
    }

    /// Whether both sides can support a two-leg spread.
    #[must_use]
    pub fn has_minimum_depth(&self) -> bool {
        self.calls.len() >= 2 && self.puts.len() >= 2
    }
}

/// Distinct expirations present in a chain snapshot, sorted ascending.
#[must_use]
pub fn listed_expirations(quotes: &[OptionQuote]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = quotes.iter().map(|q| q.expiration).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

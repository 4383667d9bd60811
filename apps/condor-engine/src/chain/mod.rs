//! Contract pool adapter.
//!
//! Converts a raw chain snapshot into the ordered candidate lists the
//! search and roll engines consume: calls ascending by strike, puts
//! descending by strike, one pool per expiration.

mod pool;
mod quote;

pub use pool::{ContractPool, listed_expirations};
pub use quote::{ContractId, OptionQuote, OptionRight};

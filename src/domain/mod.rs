//! Domain models for the consent ledger core
//!
//! Transactions, consent projections, measurement samples, and insights.

mod consent;
mod insight;
mod measurement;
mod transaction;
mod types;

pub use consent::*;
pub use insight::*;
pub use measurement::*;
pub use transaction::*;
pub use types::*;

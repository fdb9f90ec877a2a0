//! Infrastructure layer
//!
//! Contains the error taxonomy, the storage trait seams, and the in-memory
//! store implementations used by the reference deployment.

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::{InMemoryConsentStore, InMemoryInsightStore, InMemoryTransactionStore};
pub use traits::*;

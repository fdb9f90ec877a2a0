//! Cryptographic utilities
//!
//! Content hashing for ledger transactions. No chain-linking between
//! transactions is performed; the ledger is a plain append-only log.

mod hash;

pub use hash::*;

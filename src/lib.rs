//! HealthChain Core
//!
//! Consent-gated access bookkeeping for personal health records: patients
//! grant, verify, and revoke time-bounded permissions over categories of
//! health data, every permission change is recorded as an immutable ledger
//! transaction, and a rule engine derives alerts from incoming measurements.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (transactions, consents, samples, insights)
//! - [`ledger`] - Append-only transaction log, the source of truth
//! - [`registry`] - Consent projection folded from ledger events
//! - [`access`] - Verify-then-record access checks
//! - [`insight`] - Deterministic threshold rules over vitals
//! - [`auth`] - Role capability sets
//! - [`crypto`] - Canonical-JSON content hashing
//! - [`infra`] - Errors, storage traits, in-memory stores
//!
//! This crate exposes a narrow programmatic surface consumed by an HTTP
//! layer that owns routing, request validation, and authentication. It does
//! no I/O of its own; every operation completes synchronously.

pub mod access;
pub mod auth;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod insight;
pub mod ledger;
pub mod registry;

// Re-export commonly used types
pub use domain::{
    ActorAddress, ActorId, ConsentId, ConsentRecord, ConsentStatus, DataType, GranteeType,
    Insight, InsightCategory, InsightId, MeasurementCategory, MeasurementSample, PatientId,
    Severity, Transaction, TransactionDraft, TransactionKind, TxHash, VitalSigns,
};

pub use access::{AccessDecision, AccessVerifier, Accessor, DeniedReason};
pub use auth::{Capability, Role};
pub use infra::{
    ConsentStore, CoreError, InMemoryConsentStore, InMemoryInsightStore,
    InMemoryTransactionStore, InsightStore, Result, TransactionStore,
};
pub use insight::InsightEngine;
pub use ledger::Ledger;
pub use registry::{ConsentRegistry, GrantReceipt};

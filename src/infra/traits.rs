//! Trait definitions for the core storage seams
//!
//! Components take these as `Arc<dyn …>` so the backing store is injected at
//! process start. The in-memory implementations live in
//! [`crate::infra::memory`]; a persistent deployment would swap them without
//! touching the ledger, registry, or insight engine.

#[cfg(test)]
use mockall::automock;

use crate::domain::{
    ActorAddress, ConsentId, ConsentRecord, ConsentStatus, Insight, InsightId, PatientId,
    Transaction,
};

use super::Result;

/// Append-only storage for ledger transactions.
///
/// Invariant: positions are dense and insertion order is preserved. The
/// ledger serializes appends; the store only has to keep what it is given.
#[cfg_attr(test, automock)]
pub trait TransactionStore: Send + Sync {
    /// Append one transaction. Never overwrites.
    fn append(&self, tx: Transaction) -> Result<()>;

    /// Number of stored transactions
    fn len(&self) -> Result<usize>;

    /// Full history in insertion order, oldest first
    fn all(&self) -> Result<Vec<Transaction>>;

    /// Transactions whose origin or target matches, in insertion order
    fn by_address(&self, address: &ActorAddress) -> Result<Vec<Transaction>>;
}

/// Storage for the consent projection.
#[cfg_attr(test, automock)]
pub trait ConsentStore: Send + Sync {
    /// Insert a new record
    fn insert(&self, record: ConsentRecord) -> Result<()>;

    /// Set the status of the record matching (id, owner).
    ///
    /// Returns false if no such record exists; callers treat that as a
    /// no-op, not an error.
    fn set_status(
        &self,
        id: &ConsentId,
        patient_id: &PatientId,
        status: ConsentStatus,
    ) -> Result<bool>;

    /// All records for a patient, in grant order
    fn by_patient(&self, patient_id: &PatientId) -> Result<Vec<ConsentRecord>>;

    /// Drop every record; used when rebuilding the projection from the ledger
    fn clear(&self) -> Result<()>;
}

/// Storage for derived insights.
#[cfg_attr(test, automock)]
pub trait InsightStore: Send + Sync {
    /// Append a batch of freshly evaluated insights
    fn append(&self, insights: &[Insight]) -> Result<()>;

    /// All insights for a patient, in insertion order
    fn by_patient(&self, patient_id: &PatientId) -> Result<Vec<Insight>>;

    /// Mark an insight acknowledged. Returns false if the id is unknown.
    fn acknowledge(&self, id: &InsightId) -> Result<bool>;
}

//! Append-only transaction ledger
//!
//! The single source of truth for every consent-affecting or
//! access-affecting event. Appends are serialized behind a write gate so
//! positions are dense and monotonic and content hashes are unique; queries
//! read a consistent snapshot without blocking writers.
//!
//! "Blockchain" in the surrounding product is a naming choice: transactions
//! are not hash-chained to their predecessors, and nothing here retries on
//! storage failure. Retries, if any, belong to the caller.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::domain::{ActorAddress, Transaction, TransactionDraft};
use crate::infra::{CoreError, Result, TransactionStore};

/// Append-only, ordered log of transactions
pub struct Ledger {
    store: Arc<dyn TransactionStore>,

    /// Single-writer discipline: position assignment and append must not
    /// interleave between two callers.
    write_gate: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// Seal a draft at the next free position and store it.
    ///
    /// Assigns the content hash, position, timestamp, and `Confirmed`
    /// status. Never overwrites. Storage failure is terminal for the call.
    pub fn append(&self, draft: TransactionDraft) -> Result<Transaction> {
        let _guard = self
            .write_gate
            .lock()
            .map_err(|_| CoreError::Internal("ledger write gate poisoned".to_string()))?;

        let position = self.store.len()? as u64;
        let tx = draft.seal(position, chrono::Utc::now());
        self.store.append(tx.clone())?;

        debug!(
            tx_hash = %tx.hash_hex(),
            kind = tx.kind.as_str(),
            position,
            "transaction appended"
        );
        Ok(tx)
    }

    /// Transactions where the address is origin or target, oldest first;
    /// the full history when no address is given.
    pub fn query(&self, address: Option<&ActorAddress>) -> Result<Vec<Transaction>> {
        match address {
            Some(addr) => self.store.by_address(addr),
            None => self.store.all(),
        }
    }

    /// Current history length
    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConsentId, PatientId};
    use crate::infra::{InMemoryTransactionStore, MockTransactionStore};

    fn revoke_draft() -> TransactionDraft {
        TransactionDraft::consent_revoke(ConsentId::new(), &PatientId::new("p-1"))
    }

    #[test]
    fn append_assigns_monotonic_positions() {
        let ledger = Ledger::new(Arc::new(InMemoryTransactionStore::new()));
        let a = ledger.append(revoke_draft()).unwrap();
        let b = ledger.append(revoke_draft()).unwrap();
        assert_eq!(a.position, 0);
        assert_eq!(b.position, 1);
        assert_ne!(a.tx_hash, b.tx_hash);
    }

    #[test]
    fn query_without_address_returns_full_history() {
        let ledger = Ledger::new(Arc::new(InMemoryTransactionStore::new()));
        ledger.append(revoke_draft()).unwrap();
        ledger.append(revoke_draft()).unwrap();
        assert_eq!(ledger.query(None).unwrap().len(), 2);
        assert_eq!(ledger.len().unwrap(), 2);
    }

    #[test]
    fn storage_failure_surfaces_without_retry() {
        let mut store = MockTransactionStore::new();
        store
            .expect_len()
            .times(1)
            .returning(|| Err(CoreError::Storage("down".to_string())));
        let ledger = Ledger::new(Arc::new(store));

        let err = ledger.append(revoke_draft()).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }
}

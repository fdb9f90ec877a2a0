//! In-memory store implementations
//!
//! The process-local backing used by the reference deployment: plain vectors
//! behind `std::sync::RwLock`, so concurrent readers never block each other
//! and writers see a consistent snapshot. Reads return owned copies.
//!
//! A poisoned lock means a writer panicked mid-update; that is surfaced as
//! `CoreError::Storage` rather than unwrapped.

use std::sync::RwLock;

use crate::domain::{
    ActorAddress, ConsentId, ConsentRecord, ConsentStatus, Insight, InsightId, PatientId,
    Transaction,
};

use super::{ConsentStore, CoreError, InsightStore, Result, TransactionStore};

fn poisoned(store: &str) -> CoreError {
    CoreError::Storage(format!("{store} lock poisoned"))
}

/// In-memory append-only transaction log
#[derive(Default)]
pub struct InMemoryTransactionStore {
    inner: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn append(&self, tx: Transaction) -> Result<()> {
        let mut txs = self
            .inner
            .write()
            .map_err(|_| poisoned("transaction store"))?;
        txs.push(tx);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let txs = self
            .inner
            .read()
            .map_err(|_| poisoned("transaction store"))?;
        Ok(txs.len())
    }

    fn all(&self) -> Result<Vec<Transaction>> {
        let txs = self
            .inner
            .read()
            .map_err(|_| poisoned("transaction store"))?;
        Ok(txs.clone())
    }

    fn by_address(&self, address: &ActorAddress) -> Result<Vec<Transaction>> {
        let txs = self
            .inner
            .read()
            .map_err(|_| poisoned("transaction store"))?;
        Ok(txs.iter().filter(|t| t.involves(address)).cloned().collect())
    }
}

/// In-memory consent projection store
#[derive(Default)]
pub struct InMemoryConsentStore {
    inner: RwLock<Vec<ConsentRecord>>,
}

impl InMemoryConsentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsentStore for InMemoryConsentStore {
    fn insert(&self, record: ConsentRecord) -> Result<()> {
        let mut records = self.inner.write().map_err(|_| poisoned("consent store"))?;
        records.push(record);
        Ok(())
    }

    fn set_status(
        &self,
        id: &ConsentId,
        patient_id: &PatientId,
        status: ConsentStatus,
    ) -> Result<bool> {
        let mut records = self.inner.write().map_err(|_| poisoned("consent store"))?;
        match records
            .iter_mut()
            .find(|r| r.id == *id && r.patient_id == *patient_id)
        {
            Some(record) => {
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn by_patient(&self, patient_id: &PatientId) -> Result<Vec<ConsentRecord>> {
        let records = self.inner.read().map_err(|_| poisoned("consent store"))?;
        Ok(records
            .iter()
            .filter(|r| r.patient_id == *patient_id)
            .cloned()
            .collect())
    }

    fn clear(&self) -> Result<()> {
        let mut records = self.inner.write().map_err(|_| poisoned("consent store"))?;
        records.clear();
        Ok(())
    }
}

/// In-memory insight store
#[derive(Default)]
pub struct InMemoryInsightStore {
    inner: RwLock<Vec<Insight>>,
}

impl InMemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InsightStore for InMemoryInsightStore {
    fn append(&self, insights: &[Insight]) -> Result<()> {
        let mut stored = self.inner.write().map_err(|_| poisoned("insight store"))?;
        stored.extend_from_slice(insights);
        Ok(())
    }

    fn by_patient(&self, patient_id: &PatientId) -> Result<Vec<Insight>> {
        let stored = self.inner.read().map_err(|_| poisoned("insight store"))?;
        Ok(stored
            .iter()
            .filter(|i| i.patient_id == *patient_id)
            .cloned()
            .collect())
    }

    fn acknowledge(&self, id: &InsightId) -> Result<bool> {
        let mut stored = self.inner.write().map_err(|_| poisoned("insight store"))?;
        match stored.iter_mut().find(|i| i.id == *id) {
            Some(insight) => {
                insight.acknowledged = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ActorId, DataType, GranteeType, InsightCategory, Severity, TransactionDraft,
    };
    use chrono::{Duration, Utc};

    fn sample_tx(position: u64) -> Transaction {
        TransactionDraft::consent_revoke(ConsentId::new(), &PatientId::new("p-1"))
            .seal(position, Utc::now())
    }

    #[test]
    fn transaction_store_preserves_insertion_order() {
        let store = InMemoryTransactionStore::new();
        for i in 0..3 {
            store.append(sample_tx(i)).unwrap();
        }
        let all = store.all().unwrap();
        let positions: Vec<u64> = all.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn by_address_matches_origin_and_target() {
        let store = InMemoryTransactionStore::new();
        let patient = PatientId::new("p-1");
        let grantee = ActorId::new("c-1");
        let grant = TransactionDraft::consent_grant(
            ConsentId::new(),
            &patient,
            &grantee,
            GranteeType::Clinician,
            vec![DataType::vitals()],
            Utc::now() + Duration::days(7),
        )
        .seal(0, Utc::now());
        store.append(grant).unwrap();
        store.append(sample_tx(1)).unwrap();

        let by_grantee = store
            .by_address(&ActorAddress::grantee(GranteeType::Clinician, &grantee))
            .unwrap();
        assert_eq!(by_grantee.len(), 1);

        let by_patient = store.by_address(&ActorAddress::patient(&patient)).unwrap();
        assert_eq!(by_patient.len(), 2);
    }

    #[test]
    fn consent_store_set_status_requires_matching_owner() {
        let store = InMemoryConsentStore::new();
        let id = ConsentId::new();
        store
            .insert(ConsentRecord {
                id,
                patient_id: PatientId::new("p-1"),
                grantee_id: ActorId::new("c-1"),
                grantee_type: GranteeType::Clinician,
                data_types: vec![DataType::vitals()],
                status: ConsentStatus::Active,
                granted_at: Utc::now(),
                expires_at: Utc::now() + Duration::days(7),
                tx_hash: [0u8; 32],
            })
            .unwrap();

        // Wrong owner: untouched.
        assert!(!store
            .set_status(&id, &PatientId::new("p-2"), ConsentStatus::Revoked)
            .unwrap());

        assert!(store
            .set_status(&id, &PatientId::new("p-1"), ConsentStatus::Revoked)
            .unwrap());
        let records = store.by_patient(&PatientId::new("p-1")).unwrap();
        assert_eq!(records[0].status, ConsentStatus::Revoked);
    }

    #[test]
    fn insight_store_acknowledge_unknown_id_is_false() {
        let store = InMemoryInsightStore::new();
        assert!(!store.acknowledge(&InsightId::new()).unwrap());

        let insight = Insight::new(
            PatientId::new("p-1"),
            InsightCategory::Anomaly,
            Severity::High,
            0.87,
            "t",
            "d",
            serde_json::json!({}),
            "3.0.1",
        );
        let id = insight.id;
        store.append(&[insight]).unwrap();
        assert!(store.acknowledge(&id).unwrap());
        assert!(store.by_patient(&PatientId::new("p-1")).unwrap()[0].acknowledged);
    }
}

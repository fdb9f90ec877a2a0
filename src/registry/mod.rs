//! Consent registry
//!
//! Materialized view of current consent state, derived from the ledger by
//! folding grant and revoke transactions. The ledger is upstream: every
//! mutation here appends its backing transaction first, then updates the
//! projection, under one mutual-exclusion scope shared with the access
//! verifier (see [`crate::access`]).
//!
//! Preconditions on `grant` (non-empty data types, future expiry) are the
//! upstream validation layer's responsibility and are not re-validated here
//! beyond debug assertions.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{
    ActorId, ConsentId, ConsentRecord, ConsentStatus, DataType, GranteeType, PatientId,
    Transaction, TransactionDraft, TransactionPayload, TxHash,
};
use crate::infra::{ConsentStore, CoreError, Result};
use crate::ledger::Ledger;

/// Outcome of a successful grant
#[derive(Debug, Clone, Copy)]
pub struct GrantReceipt {
    pub tx_hash: TxHash,
    pub consent_id: ConsentId,
}

/// Current per-(patient, grantee, data type) consent state
pub struct ConsentRegistry {
    ledger: Arc<Ledger>,
    store: Arc<dyn ConsentStore>,

    /// Critical section spanning consent reads and their dependent ledger
    /// appends. Closing the verify-then-append race requires one scope for
    /// grant, revoke, verify, and record-access; contention is expected to
    /// be low, so the gate is global rather than per patient.
    gate: Mutex<()>,
}

impl ConsentRegistry {
    pub fn new(ledger: Arc<Ledger>, store: Arc<dyn ConsentStore>) -> Self {
        Self {
            ledger,
            store,
            gate: Mutex::new(()),
        }
    }

    /// Enter the consent critical section.
    ///
    /// Used by the access verifier to hold the scope across verification and
    /// the subsequent access append.
    pub(crate) fn enter(&self) -> Result<MutexGuard<'_, ()>> {
        self.gate
            .lock()
            .map_err(|_| CoreError::Internal("consent gate poisoned".to_string()))
    }

    /// Record a consent grant.
    ///
    /// Appends a `consent_grant` transaction and creates an `Active` record.
    /// Overlapping grants for the same (patient, grantee) pair are legal;
    /// no per-tuple uniqueness is enforced.
    pub fn grant(
        &self,
        patient_id: &PatientId,
        grantee_id: &ActorId,
        grantee_type: GranteeType,
        data_types: Vec<DataType>,
        expires_at: DateTime<Utc>,
    ) -> Result<GrantReceipt> {
        debug_assert!(!data_types.is_empty(), "upstream validation guarantees non-empty data_types");

        let _scope = self.enter()?;

        let consent_id = ConsentId::new();
        let tx = self.ledger.append(TransactionDraft::consent_grant(
            consent_id,
            patient_id,
            grantee_id,
            grantee_type,
            data_types.clone(),
            expires_at,
        ))?;

        self.store.insert(ConsentRecord {
            id: consent_id,
            patient_id: patient_id.clone(),
            grantee_id: grantee_id.clone(),
            grantee_type,
            data_types,
            status: ConsentStatus::Active,
            granted_at: tx.timestamp,
            expires_at,
            tx_hash: tx.tx_hash,
        })?;

        info!(
            tx_hash = %tx.hash_hex(),
            consent_id = %consent_id,
            patient_id = %patient_id,
            grantee_id = %grantee_id,
            "consent granted"
        );
        Ok(GrantReceipt {
            tx_hash: tx.tx_hash,
            consent_id,
        })
    }

    /// Record a consent revocation.
    ///
    /// Blind by contract: the revoke transaction is appended whether or not
    /// a matching record exists, and repeated revokes of the same id change
    /// nothing further. Unknown ids are a no-op, not an error.
    pub fn revoke(&self, consent_id: ConsentId, patient_id: &PatientId) -> Result<TxHash> {
        let _scope = self.enter()?;

        let tx = self
            .ledger
            .append(TransactionDraft::consent_revoke(consent_id, patient_id))?;

        let updated = self
            .store
            .set_status(&consent_id, patient_id, ConsentStatus::Revoked)?;
        if !updated {
            debug!(consent_id = %consent_id, patient_id = %patient_id, "revoke matched no record");
        }

        info!(tx_hash = %tx.hash_hex(), consent_id = %consent_id, "consent revoked");
        Ok(tx.tx_hash)
    }

    /// Is access currently permitted? Pure read; no transaction is recorded.
    pub fn verify(
        &self,
        patient_id: &PatientId,
        grantee_id: &ActorId,
        data_type: &DataType,
    ) -> Result<bool> {
        let _scope = self.enter()?;
        self.verify_at(patient_id, grantee_id, data_type, Utc::now())
    }

    /// Verification at an explicit instant, without taking the gate.
    ///
    /// Callers inside the critical section (the access verifier) use this to
    /// avoid re-entering the mutex.
    pub(crate) fn verify_at(
        &self,
        patient_id: &PatientId,
        grantee_id: &ActorId,
        data_type: &DataType,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let records = self.store.by_patient(patient_id)?;
        Ok(records.iter().any(|r| {
            r.grantee_id == *grantee_id && r.is_effectively_active(at) && r.covers(data_type)
        }))
    }

    /// All consent records for a patient, in grant order
    pub fn consents_of(&self, patient_id: &PatientId) -> Result<Vec<ConsentRecord>> {
        self.store.by_patient(patient_id)
    }

    /// Rebuild the projection by replaying the ledger in order.
    ///
    /// Returns the number of transactions applied. Data access transactions
    /// do not affect consent state and are skipped.
    pub fn rebuild(&self) -> Result<usize> {
        let _scope = self.enter()?;

        self.store.clear()?;
        let history = self.ledger.query(None)?;
        let mut applied = 0usize;
        for tx in &history {
            if self.apply(tx)? {
                applied += 1;
            }
        }

        info!(applied, total = history.len(), "consent projection rebuilt");
        Ok(applied)
    }

    /// Fold one ledger transaction into the projection
    fn apply(&self, tx: &Transaction) -> Result<bool> {
        match &tx.payload {
            TransactionPayload::ConsentGrant {
                consent_id,
                patient_id,
                grantee_id,
                grantee_type,
                data_types,
                expires_at,
            } => {
                self.store.insert(ConsentRecord {
                    id: *consent_id,
                    patient_id: patient_id.clone(),
                    grantee_id: grantee_id.clone(),
                    grantee_type: *grantee_type,
                    data_types: data_types.clone(),
                    status: ConsentStatus::Active,
                    granted_at: tx.timestamp,
                    expires_at: *expires_at,
                    tx_hash: tx.tx_hash,
                })?;
                Ok(true)
            }
            TransactionPayload::ConsentRevoke {
                consent_id,
                patient_id,
            } => {
                self.store
                    .set_status(consent_id, patient_id, ConsentStatus::Revoked)?;
                Ok(true)
            }
            TransactionPayload::DataAccess { .. } => Ok(false),
        }
    }
}

//! Access verification
//!
//! Verify-then-record: check the consent registry, and only if permitted,
//! append a `data_access` transaction to the ledger.
//!
//! # Concurrency contract
//!
//! Verification and the dependent append are NOT atomic on their own; a
//! revoke racing between them could record an access against a consent
//! revoked microseconds earlier. The implementation therefore holds the
//! registry's consent gate across both steps, so revokes are ordered either
//! entirely before or entirely after the access. This is an explicit choice,
//! not an accident of the ledger's append-only nature.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{Capability, Role};
use crate::domain::{ActorId, ConsentId, DataType, PatientId, TransactionDraft, TxHash};
use crate::infra::Result;
use crate::ledger::Ledger;
use crate::registry::ConsentRegistry;

/// Authenticated actor requesting access
#[derive(Debug, Clone)]
pub struct Accessor {
    pub id: ActorId,
    pub role: Role,
}

impl Accessor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: ActorId::new(id),
            role,
        }
    }
}

/// Why an access request was denied. A denial is a routine outcome, not an
/// error; the HTTP layer maps it to a forbidden response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeniedReason {
    /// The accessor's role carries no read capability
    MissingCapability,
    /// No effectively active consent covers the requested data type
    NoActiveConsent,
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy)]
pub enum AccessDecision {
    /// Access permitted and recorded on the ledger
    Granted { tx_hash: TxHash },
    /// Access refused; the ledger is untouched
    Denied { reason: DeniedReason },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }
}

/// Orchestrates the verify-then-record sequence
pub struct AccessVerifier {
    registry: Arc<ConsentRegistry>,
    ledger: Arc<Ledger>,
}

impl AccessVerifier {
    pub fn new(registry: Arc<ConsentRegistry>, ledger: Arc<Ledger>) -> Self {
        Self { registry, ledger }
    }

    /// Check consent and, if permitted, record the access.
    ///
    /// `consent_id` is the consent the caller claims to act under; it is
    /// recorded in the access transaction for audit but verification keys on
    /// (patient, accessor, data type), matching any effectively active grant.
    pub fn check_and_record_access(
        &self,
        patient_id: &PatientId,
        accessor: &Accessor,
        data_type: DataType,
        consent_id: ConsentId,
    ) -> Result<AccessDecision> {
        if !accessor.role.can(Capability::ReadPatientData) {
            debug!(
                accessor_id = %accessor.id,
                role = ?accessor.role,
                "access denied: role lacks read capability"
            );
            return Ok(AccessDecision::Denied {
                reason: DeniedReason::MissingCapability,
            });
        }

        // Verification and the access append share one critical section.
        let _scope = self.registry.enter()?;

        let now = Utc::now();
        if !self
            .registry
            .verify_at(patient_id, &accessor.id, &data_type, now)?
        {
            debug!(
                patient_id = %patient_id,
                accessor_id = %accessor.id,
                data_type = %data_type,
                "access denied: no active consent"
            );
            return Ok(AccessDecision::Denied {
                reason: DeniedReason::NoActiveConsent,
            });
        }

        let tx = self.ledger.append(TransactionDraft::data_access(
            patient_id,
            &accessor.id,
            data_type,
            consent_id,
            now,
        ))?;

        info!(
            tx_hash = %tx.hash_hex(),
            patient_id = %patient_id,
            accessor_id = %accessor.id,
            "data access recorded"
        );
        Ok(AccessDecision::Granted {
            tx_hash: tx.tx_hash,
        })
    }
}

//! Ledger transaction types
//!
//! A [`Transaction`] is one immutable recorded event: a consent grant, a
//! consent revocation, or a data access. Transactions are created only by
//! [`crate::ledger::Ledger::append`], which assigns the content hash and the
//! monotonic ledger position. A [`TransactionDraft`] is the pre-sequencing
//! form handed to the ledger by the registry and the access verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::{canonical_json_hash, transaction_hash, TransactionHashParams};

use super::{hash256_hex, ActorAddress, ActorId, ConsentId, DataType, GranteeType, PatientId, TxHash};

/// Transaction classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    ConsentGrant,
    ConsentRevoke,
    DataAccess,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::ConsentGrant => "consent_grant",
            TransactionKind::ConsentRevoke => "consent_revoke",
            TransactionKind::DataAccess => "data_access",
        }
    }
}

/// Transaction status.
///
/// This core never produces pending or failed transactions: failure is
/// synchronous and nothing is persisted, so `Confirmed` is the only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Confirmed,
}

/// Kind-specific transaction payload.
///
/// Payloads carry the structured identifiers so that the consent projection
/// can be rebuilt from the ledger alone, without parsing addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionPayload {
    ConsentGrant {
        consent_id: ConsentId,
        patient_id: PatientId,
        grantee_id: ActorId,
        grantee_type: GranteeType,
        data_types: Vec<DataType>,
        expires_at: DateTime<Utc>,
    },
    ConsentRevoke {
        consent_id: ConsentId,
        patient_id: PatientId,
    },
    DataAccess {
        data_type: DataType,
        consent_id: ConsentId,
        timestamp: DateTime<Utc>,
    },
}

/// Immutable ledger record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique record identifier
    pub id: Uuid,

    /// Content hash assigned by the ledger at append time
    #[serde(with = "hash256_hex")]
    pub tx_hash: TxHash,

    pub kind: TransactionKind,

    /// Origin actor address
    pub from_address: ActorAddress,

    /// Target actor address, absent for revocations
    pub to_address: Option<ActorAddress>,

    pub payload: TransactionPayload,

    /// Monotonic insertion position assigned by the ledger
    pub position: u64,

    /// Insertion timestamp assigned by the ledger
    pub timestamp: DateTime<Utc>,

    pub status: TransactionStatus,
}

impl Transaction {
    /// True if the given address is either the origin or the target
    pub fn involves(&self, address: &ActorAddress) -> bool {
        self.from_address == *address || self.to_address.as_ref() == Some(address)
    }

    /// Hex rendering of the content hash
    pub fn hash_hex(&self) -> String {
        hex::encode(self.tx_hash)
    }
}

/// Pre-sequencing transaction, before the ledger assigns hash and position
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub from_address: ActorAddress,
    pub to_address: Option<ActorAddress>,
    pub payload: TransactionPayload,
}

impl TransactionDraft {
    /// Draft for a consent grant: patient -> grantee
    pub fn consent_grant(
        consent_id: ConsentId,
        patient_id: &PatientId,
        grantee_id: &ActorId,
        grantee_type: GranteeType,
        data_types: Vec<DataType>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: TransactionKind::ConsentGrant,
            from_address: ActorAddress::patient(patient_id),
            to_address: Some(ActorAddress::grantee(grantee_type, grantee_id)),
            payload: TransactionPayload::ConsentGrant {
                consent_id,
                patient_id: patient_id.clone(),
                grantee_id: grantee_id.clone(),
                grantee_type,
                data_types,
                expires_at,
            },
        }
    }

    /// Draft for a consent revocation: patient only, no target
    pub fn consent_revoke(consent_id: ConsentId, patient_id: &PatientId) -> Self {
        Self {
            kind: TransactionKind::ConsentRevoke,
            from_address: ActorAddress::patient(patient_id),
            to_address: None,
            payload: TransactionPayload::ConsentRevoke {
                consent_id,
                patient_id: patient_id.clone(),
            },
        }
    }

    /// Draft for a data access: accessor -> patient
    pub fn data_access(
        patient_id: &PatientId,
        accessor_id: &ActorId,
        data_type: DataType,
        consent_id: ConsentId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: TransactionKind::DataAccess,
            from_address: ActorAddress::accessor(accessor_id),
            to_address: Some(ActorAddress::patient(patient_id)),
            payload: TransactionPayload::DataAccess {
                data_type,
                consent_id,
                timestamp,
            },
        }
    }

    /// Seal the draft into an immutable transaction.
    ///
    /// Called by the ledger under its write gate; `position` must be the
    /// next free slot.
    pub(crate) fn seal(self, position: u64, timestamp: DateTime<Utc>) -> Transaction {
        let payload_value = serde_json::to_value(&self.payload)
            .expect("transaction payload serialization is infallible");
        let payload_hash = canonical_json_hash(&payload_value);

        let tx_hash = transaction_hash(&TransactionHashParams {
            position,
            kind: self.kind.as_str(),
            from_address: self.from_address.as_str(),
            to_address: self.to_address.as_ref().map(|a| a.as_str()),
            payload_hash: &payload_hash,
            timestamp_millis: timestamp.timestamp_millis(),
        });

        Transaction {
            id: Uuid::new_v4(),
            tx_hash,
            kind: self.kind,
            from_address: self.from_address,
            to_address: self.to_address,
            payload: self.payload,
            position,
            timestamp,
            status: TransactionStatus::Confirmed,
        }
    }
}

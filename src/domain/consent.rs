//! Consent record projection
//!
//! A [`ConsentRecord`] is the materialized view of one grant, kept current by
//! the registry. Expiry is never stored: a record stays `Active` and becomes
//! ineffective once `expires_at` passes, evaluated at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{hash256_hex, ActorId, ConsentId, DataType, GranteeType, PatientId, TxHash};

/// Stored consent status. There is no `Expired` variant by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    Active,
    Revoked,
}

/// One patient-issued, time-bounded authorization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub id: ConsentId,
    pub patient_id: PatientId,
    pub grantee_id: ActorId,
    pub grantee_type: GranteeType,

    /// Data categories covered by this grant; non-empty by upstream contract
    pub data_types: Vec<DataType>,

    pub status: ConsentStatus,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    /// Hash of the originating consent_grant transaction
    #[serde(with = "hash256_hex")]
    pub tx_hash: TxHash,
}

impl ConsentRecord {
    /// Effective activity: status is `Active` and the grant has not expired
    /// at the evaluation instant.
    pub fn is_effectively_active(&self, at: DateTime<Utc>) -> bool {
        self.status == ConsentStatus::Active && at < self.expires_at
    }

    /// True if the grant covers the given data category
    pub fn covers(&self, data_type: &DataType) -> bool {
        self.data_types.contains(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: ConsentStatus, expires_in: Duration) -> ConsentRecord {
        ConsentRecord {
            id: ConsentId::new(),
            patient_id: PatientId::new("p-1"),
            grantee_id: ActorId::new("c-1"),
            grantee_type: GranteeType::Clinician,
            data_types: vec![DataType::vitals(), DataType::lab_results()],
            status,
            granted_at: Utc::now(),
            expires_at: Utc::now() + expires_in,
            tx_hash: [0u8; 32],
        }
    }

    #[test]
    fn active_unexpired_is_effective() {
        let r = record(ConsentStatus::Active, Duration::days(1));
        assert!(r.is_effectively_active(Utc::now()));
    }

    #[test]
    fn active_but_expired_is_not_effective() {
        // Status stays Active; expiry is purely a read-time predicate.
        let r = record(ConsentStatus::Active, Duration::days(-1));
        assert!(!r.is_effectively_active(Utc::now()));
        assert_eq!(r.status, ConsentStatus::Active);
    }

    #[test]
    fn revoked_is_never_effective() {
        let r = record(ConsentStatus::Revoked, Duration::days(1));
        assert!(!r.is_effectively_active(Utc::now()));
    }

    #[test]
    fn covers_checks_membership() {
        let r = record(ConsentStatus::Active, Duration::days(1));
        assert!(r.covers(&DataType::vitals()));
        assert!(!r.covers(&DataType::from("imaging")));
    }
}

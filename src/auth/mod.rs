//! Roles and capabilities
//!
//! The identity provider authenticates actors and hands this core an id and
//! a role. Authorization is modeled as a capability set per role instead of
//! string comparison, so the mapping is exhaustive and testable independent
//! of the provider's naming conventions.

use serde::{Deserialize, Serialize};

use crate::domain::GranteeType;

/// Authenticated actor role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Clinician,
    Researcher,
    Institution,
    Admin,
}

/// Actions this core distinguishes between roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    GrantConsent,
    RevokeConsent,
    ReadPatientData,
    IngestMeasurements,
    AcknowledgeInsights,
}

impl Role {
    /// Capabilities granted to this role
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Patient => &[
                GrantConsent,
                RevokeConsent,
                IngestMeasurements,
                AcknowledgeInsights,
            ],
            Role::Clinician => &[ReadPatientData, AcknowledgeInsights],
            Role::Researcher => &[ReadPatientData],
            Role::Institution => &[ReadPatientData],
            Role::Admin => &[
                GrantConsent,
                RevokeConsent,
                ReadPatientData,
                IngestMeasurements,
                AcknowledgeInsights,
            ],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl From<GranteeType> for Role {
    fn from(g: GranteeType) -> Self {
        match g {
            GranteeType::Clinician => Role::Clinician,
            GranteeType::Researcher => Role::Researcher,
            GranteeType::Institution => Role::Institution,
        }
    }
}

//! Derived health insights
//!
//! Insights are produced by the rule engine from measurement samples and
//! stored independently of the consent ledger. The `acknowledged` flag is the
//! only field ever mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{InsightId, PatientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Prediction,
    Anomaly,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One derived alert or recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: InsightId,
    pub patient_id: PatientId,
    pub category: InsightCategory,
    pub severity: Severity,

    /// Rule confidence in [0, 1]; fixed per rule
    pub confidence: f64,

    pub title: String,
    pub description: String,

    /// Triggering numeric evidence, structured per rule
    pub evidence: serde_json::Value,

    /// Version tag of the rule set that produced this insight
    pub rule_version: String,

    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}

impl Insight {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        patient_id: PatientId,
        category: InsightCategory,
        severity: Severity,
        confidence: f64,
        title: impl Into<String>,
        description: impl Into<String>,
        evidence: serde_json::Value,
        rule_version: &str,
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&confidence));
        Self {
            id: InsightId::new(),
            patient_id,
            category,
            severity,
            confidence,
            title: title.into(),
            description: description.into(),
            evidence,
            rule_version: rule_version.to_string(),
            created_at: Utc::now(),
            acknowledged: false,
        }
    }
}

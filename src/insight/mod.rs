//! Insight engine
//!
//! Stateless rule evaluation over a patient's recent measurement samples.
//! Evaluation is deterministic in its input; the only side effects are the
//! append to the insight store and logging. This pipeline is independent of
//! the ledger and the consent registry.

mod rules;

pub use rules::{RULE_VERSION_ANOMALY, RULE_VERSION_CARDIO};

use std::sync::Arc;

use tracing::info;

use crate::domain::{Insight, InsightId, MeasurementCategory, MeasurementSample, PatientId};
use crate::infra::{InsightStore, Result};

use rules::{RECENT_WINDOW, STABILITY_MIN_SAMPLES};

/// Deterministic rule evaluator and insight accessor
pub struct InsightEngine {
    store: Arc<dyn InsightStore>,
}

impl InsightEngine {
    pub fn new(store: Arc<dyn InsightStore>) -> Self {
        Self { store }
    }

    /// Evaluate the rule set against a patient's samples.
    ///
    /// Considers the 10 most recent vitals samples. Independent threshold
    /// rules run against the latest sample; the stability rule runs once the
    /// window holds at least 5 vitals samples. A malformed sample (wrong
    /// payload shape, missing fields) is skipped per rule and never aborts
    /// the evaluation.
    ///
    /// Produced insights are appended to the store and returned.
    pub fn evaluate(
        &self,
        patient_id: &PatientId,
        samples: &[MeasurementSample],
    ) -> Result<Vec<Insight>> {
        let mut recent: Vec<&MeasurementSample> = samples
            .iter()
            .filter(|s| s.category == MeasurementCategory::Vitals)
            .collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(RECENT_WINDOW);

        let mut insights = Vec::new();

        if let Some(latest) = recent.first() {
            if let Some(vitals) = latest.vital_signs() {
                insights.extend(rules::heart_rate_rule(patient_id, vitals));
                insights.extend(rules::blood_pressure_rule(patient_id, vitals));
                insights.extend(rules::glucose_rule(patient_id, vitals));
            }
        }

        if recent.len() >= STABILITY_MIN_SAMPLES {
            insights.extend(rules::stable_cardio_rule(patient_id, &recent));
        }

        self.store.append(&insights)?;
        info!(
            patient_id = %patient_id,
            produced = insights.len(),
            window = recent.len(),
            "insight evaluation complete"
        );
        Ok(insights)
    }

    /// Mark an insight acknowledged. An unknown id yields `false`, not an
    /// error.
    pub fn acknowledge(&self, insight_id: &InsightId) -> Result<bool> {
        self.store.acknowledge(insight_id)
    }

    /// All insights for a patient, newest first
    pub fn insights_of(&self, patient_id: &PatientId) -> Result<Vec<Insight>> {
        let mut insights = self.store.by_patient(patient_id)?;
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }
}

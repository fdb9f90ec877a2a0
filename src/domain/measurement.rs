//! Health measurement samples
//!
//! Samples are ingested by the patient-facing layer and fed to the insight
//! engine. They are immutable once created and never touch the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PatientId;

/// Source string marking unverified, hand-entered data
const MANUAL_SOURCE: &str = "manual";

/// Measurement classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementCategory {
    Vitals,
    LabResults,
    Imaging,
    Prescription,
    Wearable,
}

/// Blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Vital sign readings. Every field is optional: devices report partial
/// panels, and a missing field only disables the rules that need it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Beats per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,

    /// Degrees Fahrenheit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,

    /// mg/dL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose: Option<f64>,
}

/// Category-specific measurement payload.
///
/// Only vitals have a typed shape the rule engine understands; everything
/// else is carried opaquely for the consuming layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MeasurementPayload {
    Vitals(VitalSigns),
    Raw(serde_json::Value),
}

/// One immutable measurement sample, owned by the ingesting patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub patient_id: PatientId,
    pub category: MeasurementCategory,
    pub payload: MeasurementPayload,
    pub timestamp: DateTime<Utc>,
    pub source: String,

    /// True unless the sample was hand-entered
    pub verified: bool,
}

impl MeasurementSample {
    /// Vitals sample from a named source
    pub fn vitals(
        patient_id: PatientId,
        vitals: VitalSigns,
        timestamp: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            patient_id,
            category: MeasurementCategory::Vitals,
            payload: MeasurementPayload::Vitals(vitals),
            timestamp,
            verified: source != MANUAL_SOURCE,
            source,
        }
    }

    /// Non-vitals sample with an opaque payload
    pub fn raw(
        patient_id: PatientId,
        category: MeasurementCategory,
        data: serde_json::Value,
        timestamp: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            patient_id,
            category,
            payload: MeasurementPayload::Raw(data),
            timestamp,
            verified: source != MANUAL_SOURCE,
            source,
        }
    }

    /// Typed vitals, if this sample carries them
    pub fn vital_signs(&self) -> Option<&VitalSigns> {
        match &self.payload {
            MeasurementPayload::Vitals(v) => Some(v),
            MeasurementPayload::Raw(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_source_is_unverified() {
        let s = MeasurementSample::vitals(
            PatientId::new("p-1"),
            VitalSigns::default(),
            Utc::now(),
            "manual",
        );
        assert!(!s.verified);

        let s = MeasurementSample::vitals(
            PatientId::new("p-1"),
            VitalSigns::default(),
            Utc::now(),
            "apple_watch",
        );
        assert!(s.verified);
    }

    #[test]
    fn raw_payload_has_no_vital_signs() {
        let s = MeasurementSample::raw(
            PatientId::new("p-1"),
            MeasurementCategory::LabResults,
            serde_json::json!({"panel": "cbc"}),
            Utc::now(),
            "lab",
        );
        assert!(s.vital_signs().is_none());
    }
}

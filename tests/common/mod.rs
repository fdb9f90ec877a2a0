//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use healthchain_core::{
    AccessVerifier, ConsentRegistry, InMemoryConsentStore, InMemoryInsightStore,
    InMemoryTransactionStore, InsightEngine, Ledger, MeasurementSample, PatientId, VitalSigns,
};

/// Fully wired core over in-memory stores
pub struct TestCore {
    pub ledger: Arc<Ledger>,
    pub registry: Arc<ConsentRegistry>,
    pub verifier: AccessVerifier,
    pub engine: InsightEngine,
}

pub fn build_core() -> TestCore {
    let ledger = Arc::new(Ledger::new(Arc::new(InMemoryTransactionStore::new())));
    let registry = Arc::new(ConsentRegistry::new(
        Arc::clone(&ledger),
        Arc::new(InMemoryConsentStore::new()),
    ));
    let verifier = AccessVerifier::new(Arc::clone(&registry), Arc::clone(&ledger));
    let engine = InsightEngine::new(Arc::new(InMemoryInsightStore::new()));
    TestCore {
        ledger,
        registry,
        verifier,
        engine,
    }
}

pub fn patient() -> PatientId {
    PatientId::new("patient-1")
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Vitals sample with only a heart rate, aged back `minutes_ago`
pub fn hr_sample(patient_id: &PatientId, hr: f64, minutes_ago: i64) -> MeasurementSample {
    MeasurementSample::vitals(
        patient_id.clone(),
        VitalSigns {
            heart_rate: Some(hr),
            ..Default::default()
        },
        Utc::now() - Duration::minutes(minutes_ago),
        "monitor",
    )
}

/// Vitals sample with an arbitrary panel, aged back `minutes_ago`
pub fn vitals_sample(
    patient_id: &PatientId,
    vitals: VitalSigns,
    minutes_ago: i64,
) -> MeasurementSample {
    MeasurementSample::vitals(
        patient_id.clone(),
        vitals,
        Utc::now() - Duration::minutes(minutes_ago),
        "monitor",
    )
}

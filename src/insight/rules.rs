//! Threshold rule set
//!
//! Each rule is an independent pure function from the latest vitals (or the
//! recent window, for the stability rule) to at most one insight. Rules only
//! read the fields they need; a sample missing a field simply does not fire
//! that rule.
//!
//! Confidences are fixed per rule. Version tags identify which rule
//! generation produced an insight and follow the deployed model lineage:
//! anomaly rules are tagged 3.0.1, cardiovascular/metabolic rules 2.1.0.

use serde_json::json;

use crate::domain::{Insight, InsightCategory, MeasurementSample, PatientId, Severity, VitalSigns};

/// Version tag for anomaly-detection rules
pub const RULE_VERSION_ANOMALY: &str = "3.0.1";

/// Version tag for cardiovascular and metabolic rules
pub const RULE_VERSION_CARDIO: &str = "2.1.0";

/// Vitals samples considered per evaluation
pub const RECENT_WINDOW: usize = 10;

/// Minimum vitals samples before the stability rule applies
pub const STABILITY_MIN_SAMPLES: usize = 5;

// Heart rate bounds, BPM
const HR_LOW: f64 = 60.0;
const HR_HIGH: f64 = 100.0;
const HR_SEVERE_LOW: f64 = 50.0;
const HR_SEVERE_HIGH: f64 = 120.0;
const HR_STABLE_LOW: f64 = 60.0;
const HR_STABLE_HIGH: f64 = 80.0;

// Blood pressure bounds, mmHg
const BP_SYSTOLIC_HIGH: f64 = 140.0;
const BP_DIASTOLIC_HIGH: f64 = 90.0;
const BP_SYSTOLIC_SEVERE: f64 = 160.0;
const BP_DIASTOLIC_SEVERE: f64 = 100.0;

// Glucose bounds, mg/dL
const GLUCOSE_HIGH: f64 = 126.0;
const GLUCOSE_SEVERE: f64 = 200.0;

/// Heart rate outside [60, 100] BPM
pub fn heart_rate_rule(patient_id: &PatientId, vitals: &VitalSigns) -> Option<Insight> {
    let hr = vitals.heart_rate?;
    if hr <= HR_HIGH && hr >= HR_LOW {
        return None;
    }

    let severity = if hr > HR_SEVERE_HIGH || hr < HR_SEVERE_LOW {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(Insight::new(
        patient_id.clone(),
        InsightCategory::Anomaly,
        severity,
        0.87,
        "Irregular Heart Rate Detected",
        format!(
            "Heart rate of {hr} BPM is outside normal range. Consider monitoring closely."
        ),
        json!({ "heart_rate": hr, "threshold": "60-100 BPM" }),
        RULE_VERSION_ANOMALY,
    ))
}

/// Systolic above 140 or diastolic above 90 mmHg
pub fn blood_pressure_rule(patient_id: &PatientId, vitals: &VitalSigns) -> Option<Insight> {
    let bp = vitals.blood_pressure?;
    if bp.systolic <= BP_SYSTOLIC_HIGH && bp.diastolic <= BP_DIASTOLIC_HIGH {
        return None;
    }

    let severity = if bp.systolic > BP_SYSTOLIC_SEVERE || bp.diastolic > BP_DIASTOLIC_SEVERE {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(Insight::new(
        patient_id.clone(),
        InsightCategory::Prediction,
        severity,
        0.92,
        "Hypertension Risk Detected",
        format!(
            "Blood pressure {}/{} indicates potential hypertension. Lifestyle modifications recommended.",
            bp.systolic, bp.diastolic
        ),
        json!({ "blood_pressure": { "systolic": bp.systolic, "diastolic": bp.diastolic } }),
        RULE_VERSION_CARDIO,
    ))
}

/// Glucose above 126 mg/dL
pub fn glucose_rule(patient_id: &PatientId, vitals: &VitalSigns) -> Option<Insight> {
    let glucose = vitals.glucose?;
    if glucose <= GLUCOSE_HIGH {
        return None;
    }

    let severity = if glucose > GLUCOSE_SEVERE {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(Insight::new(
        patient_id.clone(),
        InsightCategory::Prediction,
        severity,
        0.89,
        "Elevated Glucose Levels",
        format!(
            "Glucose level of {glucose} mg/dL suggests potential diabetes risk. Consult with endocrinologist."
        ),
        json!({ "glucose": glucose, "threshold": "<126 mg/dL" }),
        RULE_VERSION_CARDIO,
    ))
}

/// Mean heart rate over the recent window inside [60, 80] BPM.
///
/// Samples without a heart rate are ignored for the mean; if none carry one
/// the rule does not fire.
pub fn stable_cardio_rule(
    patient_id: &PatientId,
    recent_vitals: &[&MeasurementSample],
) -> Option<Insight> {
    let rates: Vec<f64> = recent_vitals
        .iter()
        .filter_map(|s| s.vital_signs())
        .filter_map(|v| v.heart_rate)
        .collect();
    if rates.is_empty() {
        return None;
    }

    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    if !(HR_STABLE_LOW..=HR_STABLE_HIGH).contains(&mean) {
        return None;
    }

    Some(Insight::new(
        patient_id.clone(),
        InsightCategory::Recommendation,
        Severity::Low,
        0.94,
        "Excellent Cardiovascular Health",
        "Your heart rate has been consistently in the optimal range. Continue your current exercise routine.",
        json!({ "average_heart_rate": mean.round() }),
        RULE_VERSION_CARDIO,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn patient() -> PatientId {
        PatientId::new("p-1")
    }

    fn vitals_hr(hr: f64) -> VitalSigns {
        VitalSigns {
            heart_rate: Some(hr),
            ..Default::default()
        }
    }

    #[test]
    fn heart_rate_110_fires_medium_anomaly() {
        let insight = heart_rate_rule(&patient(), &vitals_hr(110.0)).unwrap();
        assert_eq!(insight.category, InsightCategory::Anomaly);
        assert_eq!(insight.severity, Severity::Medium);
        assert_eq!(insight.confidence, 0.87);
        assert_eq!(insight.rule_version, RULE_VERSION_ANOMALY);
    }

    #[test]
    fn heart_rate_125_fires_high() {
        let insight = heart_rate_rule(&patient(), &vitals_hr(125.0)).unwrap();
        assert_eq!(insight.severity, Severity::High);
    }

    #[test]
    fn heart_rate_45_fires_high() {
        let insight = heart_rate_rule(&patient(), &vitals_hr(45.0)).unwrap();
        assert_eq!(insight.severity, Severity::High);
    }

    #[test]
    fn heart_rate_in_range_is_silent() {
        assert!(heart_rate_rule(&patient(), &vitals_hr(72.0)).is_none());
        // Boundary values do not fire: the rule is strict >100 / <60.
        assert!(heart_rate_rule(&patient(), &vitals_hr(100.0)).is_none());
        assert!(heart_rate_rule(&patient(), &vitals_hr(60.0)).is_none());
    }

    #[test]
    fn heart_rate_missing_is_silent() {
        assert!(heart_rate_rule(&patient(), &VitalSigns::default()).is_none());
    }

    #[test]
    fn blood_pressure_150_95_fires_medium_prediction() {
        let vitals = VitalSigns {
            blood_pressure: Some(crate::domain::BloodPressure {
                systolic: 150.0,
                diastolic: 95.0,
            }),
            ..Default::default()
        };
        let insight = blood_pressure_rule(&patient(), &vitals).unwrap();
        assert_eq!(insight.category, InsightCategory::Prediction);
        assert_eq!(insight.severity, Severity::Medium);
        assert_eq!(insight.confidence, 0.92);
    }

    #[test]
    fn blood_pressure_170_105_fires_high() {
        let vitals = VitalSigns {
            blood_pressure: Some(crate::domain::BloodPressure {
                systolic: 170.0,
                diastolic: 105.0,
            }),
            ..Default::default()
        };
        let insight = blood_pressure_rule(&patient(), &vitals).unwrap();
        assert_eq!(insight.severity, Severity::High);
    }

    #[test]
    fn glucose_130_fires_high_prediction() {
        let vitals = VitalSigns {
            glucose: Some(130.0),
            ..Default::default()
        };
        let insight = glucose_rule(&patient(), &vitals).unwrap();
        assert_eq!(insight.category, InsightCategory::Prediction);
        assert_eq!(insight.severity, Severity::High);
        assert_eq!(insight.confidence, 0.89);
    }

    #[test]
    fn glucose_210_fires_critical() {
        let vitals = VitalSigns {
            glucose: Some(210.0),
            ..Default::default()
        };
        let insight = glucose_rule(&patient(), &vitals).unwrap();
        assert_eq!(insight.severity, Severity::Critical);
    }

    #[test]
    fn stable_cardio_fires_inside_inclusive_range() {
        let samples: Vec<MeasurementSample> = [60.0, 70.0, 80.0, 75.0, 65.0]
            .iter()
            .map(|hr| {
                MeasurementSample::vitals(patient(), vitals_hr(*hr), Utc::now(), "monitor")
            })
            .collect();
        let refs: Vec<&MeasurementSample> = samples.iter().collect();

        let insight = stable_cardio_rule(&patient(), &refs).unwrap();
        assert_eq!(insight.category, InsightCategory::Recommendation);
        assert_eq!(insight.severity, Severity::Low);
        assert_eq!(insight.confidence, 0.94);
        assert_eq!(insight.evidence["average_heart_rate"], 70.0);
    }

    #[test]
    fn stable_cardio_ignores_samples_without_heart_rate() {
        let mut samples: Vec<MeasurementSample> = [70.0, 72.0]
            .iter()
            .map(|hr| {
                MeasurementSample::vitals(patient(), vitals_hr(*hr), Utc::now(), "monitor")
            })
            .collect();
        samples.push(MeasurementSample::vitals(
            patient(),
            VitalSigns::default(),
            Utc::now(),
            "monitor",
        ));
        let refs: Vec<&MeasurementSample> = samples.iter().collect();

        // Mean over the two present readings, not three.
        let insight = stable_cardio_rule(&patient(), &refs).unwrap();
        assert_eq!(insight.evidence["average_heart_rate"], 71.0);
    }

    #[test]
    fn stable_cardio_silent_without_any_heart_rate() {
        let samples: Vec<MeasurementSample> = (0..5)
            .map(|_| {
                MeasurementSample::vitals(patient(), VitalSigns::default(), Utc::now(), "monitor")
            })
            .collect();
        let refs: Vec<&MeasurementSample> = samples.iter().collect();
        assert!(stable_cardio_rule(&patient(), &refs).is_none());
    }
}

//! Session history: the in-memory sequence of completed assessments.

use crate::domain::PredictionRecord;

/// Insertion-ordered, session-lifetime sequence of prediction records.
///
/// Newest entries sit at the front; the shell prepends on completion and
/// views render the sequence as given. Nothing is persisted — the history
/// dies with the process.
#[derive(Debug, Default)]
pub struct SessionHistory {
    records: Vec<PredictionRecord>,
}

impl SessionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a freshly completed assessment.
    pub fn record(&mut self, record: PredictionRecord) {
        self.records.insert(0, record);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// All records, newest first.
    #[must_use]
    pub fn entries(&self) -> &[PredictionRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientRecord, PredictionRecord, SmokingStatus};

    fn record_with_age(age: f64) -> PredictionRecord {
        let patient = PatientRecord {
            age,
            hypertension: false,
            heart_disease: false,
            avg_glucose_level: 100.0,
            bmi: 25.0,
            smoking_status: SmokingStatus::Never,
        };
        let prediction = serde_json::from_value(serde_json::json!({
            "timestamp": "2026-08-06T14:02:11",
            "stroke_probability": 0.1,
            "no_stroke_probability": 0.9,
            "risk_level": "Low",
            "confidence": 0.9
        }))
        .expect("stub prediction should deserialize");
        PredictionRecord::new(patient, prediction)
    }

    #[test]
    fn test_starts_empty() {
        let history = SessionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_newest_entry_is_first() {
        let mut history = SessionHistory::new();
        history.record(record_with_age(40.0));
        history.record(record_with_age(60.0));

        assert_eq!(history.len(), 2);
        assert!((history.entries()[0].patient.age - 60.0).abs() < f64::EPSILON);
        assert!((history.entries()[1].patient.age - 40.0).abs() < f64::EPSILON);
    }
}

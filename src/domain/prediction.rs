//! Prediction result types.
//!
//! Represents the output of the remote stroke-risk prediction service and
//! the combined record kept in the session history.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::PatientRecord;

/// Risk level classification returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk of stroke
    Low,
    /// Medium risk, monitoring recommended
    Medium,
    /// High risk, intervention recommended
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Medium => "Medium risk - Follow-up recommended",
            Self::High => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Successful response body of the prediction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Risk classification
    pub risk_level: RiskLevel,

    /// Probability of stroke (0.0 to 1.0)
    pub stroke_probability: f64,

    /// Probability of no stroke (0.0 to 1.0); expected to complement
    /// `stroke_probability` but not enforced locally
    pub no_stroke_probability: f64,

    /// Confidence score (0.0 to 1.0)
    pub confidence: f64,

    /// Assessment time as reported by the service
    #[serde(
        serialize_with = "ser_wire_timestamp",
        deserialize_with = "de_wire_timestamp"
    )]
    pub timestamp: NaiveDateTime,

    /// Binary classifier output echoed by the service; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
}

/// A completed assessment: the submitted vitals plus the service's answer.
///
/// Composed client-side on a successful response and held only in the
/// session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub patient: PatientRecord,
    pub prediction: Prediction,
}

impl PredictionRecord {
    #[must_use]
    pub fn new(patient: PatientRecord, prediction: Prediction) -> Self {
        Self { patient, prediction }
    }
}

/// Parse a service timestamp.
///
/// The reference service emits naive ISO 8601 (`datetime.now().isoformat()`,
/// no offset); RFC 3339 with an offset is accepted too.
pub fn parse_wire_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|err| format!("invalid timestamp {raw:?}: {err}"))
}

fn ser_wire_timestamp<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

fn de_wire_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_wire_timestamp(&raw).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SmokingStatus;

    #[test]
    fn test_risk_level_wire_names() {
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), "High");
        let level: RiskLevel = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(level, RiskLevel::Medium);
    }

    #[test]
    fn test_prediction_decodes_service_response() {
        // Shape of the reference service's 200 body, naive timestamp included.
        let prediction: Prediction = serde_json::from_value(serde_json::json!({
            "timestamp": "2026-08-06T14:02:11.123456",
            "patient_data": { "age": 55 },
            "prediction": 0,
            "stroke_probability": 0.125,
            "no_stroke_probability": 0.875,
            "risk_level": "Low",
            "confidence": 0.875
        }))
        .expect("should deserialize");

        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert!((prediction.stroke_probability - 0.125).abs() < f64::EPSILON);
        assert_eq!(prediction.prediction, Some(0));
        assert_eq!(
            prediction.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2026-08-06 14:02:11"
        );
    }

    #[test]
    fn test_wire_timestamp_accepts_rfc3339() {
        let parsed = parse_wire_timestamp("2026-08-06T14:02:11+00:00").expect("should parse");
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "14:02:11");
        assert!(parse_wire_timestamp("not a timestamp").is_err());
    }

    #[test]
    fn test_record_embeds_patient() {
        let patient = PatientRecord {
            age: 55.0,
            hypertension: true,
            heart_disease: false,
            avg_glucose_level: 120.5,
            bmi: 27.3,
            smoking_status: SmokingStatus::Never,
        };
        let prediction: Prediction = serde_json::from_value(serde_json::json!({
            "timestamp": "2026-08-06T14:02:11",
            "stroke_probability": 0.75,
            "no_stroke_probability": 0.25,
            "risk_level": "High",
            "confidence": 0.75
        }))
        .unwrap();

        let record = PredictionRecord::new(patient.clone(), prediction);
        assert_eq!(record.patient, patient);
        assert_eq!(record.prediction.risk_level, RiskLevel::High);
    }
}

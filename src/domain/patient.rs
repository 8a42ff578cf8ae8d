//! Patient record types for stroke risk prediction.
//!
//! Field set and ranges match the remote prediction service's validation
//! rules; the wire format encodes booleans as 0/1 and the smoking status as
//! an integer code.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted age range in years.
pub const AGE_RANGE: RangeInclusive<f64> = 18.0..=120.0;
/// Accepted average glucose level range in mg/dL.
pub const GLUCOSE_RANGE: RangeInclusive<f64> = 50.0..=300.0;
/// Accepted BMI range in kg/m².
pub const BMI_RANGE: RangeInclusive<f64> = 10.0..=50.0;

pub const AGE_RANGE_MESSAGE: &str = "Age must be between 18 and 120";
pub const GLUCOSE_RANGE_MESSAGE: &str = "Glucose level must be between 50 and 300 mg/dL";
pub const BMI_RANGE_MESSAGE: &str = "BMI must be between 10 and 50";

/// Smoking status, wire-encoded as an integer code (0-3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SmokingStatus {
    #[default]
    Never,
    Formerly,
    Current,
    Unknown,
}

impl SmokingStatus {
    /// All statuses in selector order.
    pub const ALL: [Self; 4] = [Self::Never, Self::Formerly, Self::Current, Self::Unknown];

    /// Human-readable label, matching the intake form options.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Never => "Never smoked",
            Self::Formerly => "Formerly smoked",
            Self::Current => "Smokes",
            Self::Unknown => "Unknown",
        }
    }

    /// Integer code used on the wire.
    #[must_use]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Next status in selector order, wrapping.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::ALL[(*self as usize + 1) % Self::ALL.len()]
    }

    /// Previous status in selector order, wrapping.
    #[must_use]
    pub fn prev(&self) -> Self {
        Self::ALL[(*self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl From<SmokingStatus> for u8 {
    fn from(status: SmokingStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for SmokingStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| format!("Smoking status code {code} out of range [0, 3]"))
    }
}

/// A single patient's vitals as submitted to the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: f64,

    /// Diagnosed hypertension (wire: 0/1)
    #[serde(with = "int_bool")]
    pub hypertension: bool,

    /// Diagnosed heart disease (wire: 0/1)
    #[serde(with = "int_bool")]
    pub heart_disease: bool,

    /// Average glucose level in mg/dL
    pub avg_glucose_level: f64,

    /// Body mass index in kg/m²
    pub bmi: f64,

    /// Smoking status (wire: integer code)
    pub smoking_status: SmokingStatus,
}

impl PatientRecord {
    /// Validate that the numeric fields are within the service's accepted
    /// ranges. Boundaries are inclusive.
    ///
    /// # Errors
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !AGE_RANGE.contains(&self.age) {
            errors.push(AGE_RANGE_MESSAGE.to_string());
        }
        if !GLUCOSE_RANGE.contains(&self.avg_glucose_level) {
            errors.push(GLUCOSE_RANGE_MESSAGE.to_string());
        }
        if !BMI_RANGE.contains(&self.bmi) {
            errors.push(BMI_RANGE_MESSAGE.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Serialize booleans as 0/1 integers, matching the service's encoding.
mod int_bool {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("expected 0 or 1, got {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> PatientRecord {
        PatientRecord {
            age: 55.0,
            hypertension: true,
            heart_disease: false,
            avg_glucose_level: 120.5,
            bmi: 27.3,
            smoking_status: SmokingStatus::Never,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn test_age_boundaries_inclusive() {
        for age in [18.0, 120.0] {
            let record = PatientRecord { age, ..valid_record() };
            assert!(record.validate().is_ok(), "age {age} should pass");
        }
        for age in [17.9, 120.1] {
            let record = PatientRecord { age, ..valid_record() };
            let errors = record.validate().expect_err("should fail");
            assert_eq!(errors, vec![AGE_RANGE_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_glucose_and_bmi_boundaries() {
        for glucose in [50.0, 300.0] {
            let record = PatientRecord { avg_glucose_level: glucose, ..valid_record() };
            assert!(record.validate().is_ok());
        }
        for bmi in [10.0, 50.0] {
            let record = PatientRecord { bmi, ..valid_record() };
            assert!(record.validate().is_ok());
        }

        let record = PatientRecord { avg_glucose_level: 49.9, bmi: 50.1, ..valid_record() };
        let errors = record.validate().expect_err("should fail");
        assert_eq!(
            errors,
            vec![GLUCOSE_RANGE_MESSAGE.to_string(), BMI_RANGE_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_wire_encoding_uses_integer_codes() {
        let value = serde_json::to_value(valid_record()).expect("should serialize");
        assert_eq!(value["age"], 55.0);
        assert_eq!(value["hypertension"], 1);
        assert_eq!(value["heart_disease"], 0);
        assert_eq!(value["smoking_status"], 0);
    }

    #[test]
    fn test_wire_decoding_round_trip() {
        let record: PatientRecord = serde_json::from_value(serde_json::json!({
            "age": 61,
            "hypertension": 0,
            "heart_disease": 1,
            "avg_glucose_level": 140.2,
            "bmi": 31.0,
            "smoking_status": 2
        }))
        .expect("should deserialize");

        assert!(!record.hypertension);
        assert!(record.heart_disease);
        assert_eq!(record.smoking_status, SmokingStatus::Current);
    }

    #[test]
    fn test_smoking_status_codes_and_cycling() {
        assert_eq!(SmokingStatus::Never.code(), 0);
        assert_eq!(SmokingStatus::Unknown.code(), 3);
        assert_eq!(SmokingStatus::Unknown.next(), SmokingStatus::Never);
        assert_eq!(SmokingStatus::Never.prev(), SmokingStatus::Unknown);
        assert!(SmokingStatus::try_from(4).is_err());
    }
}

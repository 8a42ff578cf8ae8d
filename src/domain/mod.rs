//! Domain layer: Core types for patient intake and prediction results.
//!
//! Pure Rust types with no knowledge of the transport. The wire encodings
//! (0/1 booleans, integer smoking codes, naive ISO 8601 timestamps) live
//! here so the rest of the crate deals in typed values.

mod patient;
mod prediction;

pub use patient::{
    PatientRecord, SmokingStatus, AGE_RANGE, AGE_RANGE_MESSAGE, BMI_RANGE, BMI_RANGE_MESSAGE,
    GLUCOSE_RANGE, GLUCOSE_RANGE_MESSAGE,
};
pub use prediction::{parse_wire_timestamp, Prediction, PredictionRecord, RiskLevel};

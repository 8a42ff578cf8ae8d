//! Assessment service: Orchestrates risk assessment against the remote
//! prediction service.
//!
//! This service coordinates:
//! - Fail-closed validation of the patient record
//! - Submission to the prediction endpoint
//! - Composition of the history record from request and response
//! - Statistics, model metadata, and health passthroughs

use std::sync::Arc;

use crate::domain::{PatientRecord, PredictionRecord};
use crate::ports::{ApiHealth, ModelInfo, PredictionApi, StatsReport};
use crate::{Result, StrokewatchError};

/// Service for running assessments and auxiliary fetches.
pub struct AssessmentService<A>
where
    A: PredictionApi,
{
    api: Arc<A>,
}

impl<A> AssessmentService<A>
where
    A: PredictionApi,
{
    /// Create a new assessment service.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Validate and submit a patient record.
    ///
    /// Fail-closed: nothing is sent when validation fails. On success the
    /// submitted vitals are embedded in the returned record for history
    /// display.
    ///
    /// # Errors
    /// Returns a validation error with all failing fields joined, or the
    /// API error from the request.
    pub fn submit(&self, patient: PatientRecord) -> Result<PredictionRecord> {
        if let Err(errors) = patient.validate() {
            return Err(StrokewatchError::Validation(errors.join(", ")));
        }

        let prediction = self.api.predict(&patient)?;

        tracing::info!(
            "Assessment complete: risk={}, stroke probability={:.1}%, confidence={:.1}%",
            prediction.risk_level,
            prediction.stroke_probability * 100.0,
            prediction.confidence * 100.0
        );

        Ok(PredictionRecord::new(patient, prediction))
    }

    /// Fetch aggregate statistics.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub fn fetch_statistics(&self) -> Result<StatsReport> {
        Ok(self.api.stats()?)
    }

    /// Fetch descriptive model metadata.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub fn fetch_model_info(&self) -> Result<ModelInfo> {
        Ok(self.api.model_info()?)
    }

    /// Probe the service's liveness endpoint.
    #[must_use]
    pub fn probe_health(&self) -> ApiHealth {
        self.api.health()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::{Prediction, RiskLevel, SmokingStatus};
    use crate::ports::ApiError;

    type ApiResult<T> = std::result::Result<T, ApiError>;

    struct StubApi {
        predict_response: ApiResult<Prediction>,
        predict_calls: AtomicUsize,
    }

    impl StubApi {
        fn new(predict_response: ApiResult<Prediction>) -> Self {
            Self { predict_response, predict_calls: AtomicUsize::new(0) }
        }
    }

    impl PredictionApi for StubApi {
        fn health(&self) -> ApiHealth {
            ApiHealth::Healthy
        }

        fn model_info(&self) -> ApiResult<ModelInfo> {
            Err(ApiError::Transport("unused".to_string()))
        }

        fn predict(&self, _patient: &PatientRecord) -> ApiResult<Prediction> {
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            self.predict_response.clone()
        }

        fn stats(&self) -> ApiResult<StatsReport> {
            Err(ApiError::Transport("unused".to_string()))
        }
    }

    fn low_risk_prediction() -> Prediction {
        serde_json::from_value(serde_json::json!({
            "timestamp": "2026-08-06T14:02:11",
            "stroke_probability": 0.125,
            "no_stroke_probability": 0.875,
            "risk_level": "Low",
            "confidence": 0.875
        }))
        .expect("stub prediction should deserialize")
    }

    fn valid_patient() -> PatientRecord {
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
    fn test_submit_embeds_patient_in_record() {
        let api = Arc::new(StubApi::new(Ok(low_risk_prediction())));
        let service = AssessmentService::new(api.clone());

        let record = service.submit(valid_patient()).expect("should submit");

        assert_eq!(record.patient, valid_patient());
        assert_eq!(record.prediction.risk_level, RiskLevel::Low);
        assert_eq!(api.predict_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_is_fail_closed() {
        let api = Arc::new(StubApi::new(Ok(low_risk_prediction())));
        let service = AssessmentService::new(api.clone());

        let invalid = PatientRecord { age: 10.0, ..valid_patient() };
        let err = service.submit(invalid).expect_err("should fail");

        assert!(err.user_message().contains("Age must be between 18 and 120"));
        assert_eq!(api.predict_calls.load(Ordering::SeqCst), 0, "nothing must be sent");
    }

    #[test]
    fn test_submit_surfaces_server_detail() {
        let api = Arc::new(StubApi::new(Err(ApiError::Rejected {
            status: 400,
            message: "BMI out of range".to_string(),
        })));
        let service = AssessmentService::new(api);

        let err = service.submit(valid_patient()).expect_err("should fail");
        assert_eq!(err.user_message(), "BMI out of range");
    }
}

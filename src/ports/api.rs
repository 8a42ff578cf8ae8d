//! Prediction API port: Trait for the remote stroke-risk service.
//!
//! Abstracts the HTTP transport away from the application logic so the UI
//! can be exercised against stub implementations.

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

use crate::domain::{parse_wire_timestamp, PatientRecord, Prediction};

/// Fixed fallback shown when a prediction request fails without a
/// server-reported message.
pub const PREDICT_FALLBACK_MESSAGE: &str = "Failed to get prediction. Please try again.";

/// Errors that can occur when talking to the prediction service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status. `message` carries the
    /// most specific server-reported text (per-field details preferred over
    /// the generic error string), or is empty when the body had neither.
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Most specific message suitable for inline display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => PREDICT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Outcome classification of the liveness probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiHealth {
    /// No probe has completed yet (initial state; never returned by adapters)
    #[default]
    Checking,
    /// The service answered 2xx
    Healthy,
    /// The service answered, but not 2xx
    Unhealthy,
    /// The request failed at the transport level
    Disconnected,
}

impl ApiHealth {
    /// Status text for the header indicator.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Descriptive model metadata, fetched once for informational display.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub model: ModelSummary,
    #[serde(default)]
    pub features: Vec<String>,
    /// Absence means the service predates the flag; assume loaded.
    #[serde(default = "default_model_loaded")]
    pub model_loaded: bool,
}

fn default_model_loaded() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSummary {
    pub model_type: String,
    #[serde(default)]
    pub accuracy: f64,
}

/// Per-level counts of the service's risk distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RiskCounts {
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
}

/// Pre-aggregated statistics from the stats endpoint.
///
/// Every field except `total_predictions` defaults when absent: the
/// reference service's zero-state body is `{"total_predictions": 0,
/// "stats": {}}`. Percentages are never taken from the wire; views derive
/// them from the raw counts.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsReport {
    pub total_predictions: u64,
    #[serde(default)]
    pub average_age: f64,
    #[serde(default)]
    pub risk_distribution: RiskCounts,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

fn de_opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_wire_timestamp(&s).map_err(de::Error::custom))
        .transpose()
}

/// Client seam for the prediction service.
///
/// Implementations classify transport outcomes themselves; callers never see
/// raw HTTP types.
pub trait PredictionApi: Send + Sync {
    /// Probe the liveness endpoint and classify the outcome.
    fn health(&self) -> ApiHealth;

    /// Fetch descriptive model metadata.
    ///
    /// # Errors
    /// Returns error if the request or decoding fails.
    fn model_info(&self) -> Result<ModelInfo, ApiError>;

    /// Submit a patient record for risk assessment.
    ///
    /// # Errors
    /// Returns error if the request fails or the service rejects the record.
    fn predict(&self, patient: &PatientRecord) -> Result<Prediction, ApiError>;

    /// Fetch aggregate statistics.
    ///
    /// # Errors
    /// Returns error if the request or decoding fails.
    fn stats(&self) -> Result<StatsReport, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_state_stats_body_decodes() {
        // Verbatim zero-state body of the reference service.
        let report: StatsReport =
            serde_json::from_str(r#"{"total_predictions": 0, "stats": {}}"#)
                .expect("should deserialize");

        assert_eq!(report.total_predictions, 0);
        assert_eq!(report.risk_distribution, RiskCounts::default());
        assert!(report.timestamp.is_none());
    }

    #[test]
    fn test_full_stats_body_decodes() {
        let report: StatsReport = serde_json::from_value(serde_json::json!({
            "total_predictions": 20,
            "risk_distribution": { "high": 3, "medium": 5, "low": 12 },
            "average_age": 43.1,
            "timestamp": "2026-08-06T14:02:11.123456"
        }))
        .expect("should deserialize");

        assert_eq!(report.total_predictions, 20);
        assert_eq!(report.risk_distribution.high, 3);
        assert_eq!(report.risk_distribution.low, 12);
        assert!(report.timestamp.is_some());
    }

    #[test]
    fn test_model_info_tolerates_extra_fields() {
        let info: ModelInfo = serde_json::from_value(serde_json::json!({
            "model": {
                "model_type": "RandomForestClassifier",
                "training_date": "2026-02-07",
                "accuracy": 0.95,
                "features": ["age"]
            },
            "model_loaded": true,
            "features": ["age", "hypertension"],
            "validation_rules": {}
        }))
        .expect("should deserialize");

        assert_eq!(info.model.model_type, "RandomForestClassifier");
        assert!(info.model_loaded);
        assert_eq!(info.features.len(), 2);
    }

    #[test]
    fn test_user_message_prefers_server_detail() {
        let rejected = ApiError::Rejected {
            status: 400,
            message: "BMI out of range".to_string(),
        };
        assert_eq!(rejected.user_message(), "BMI out of range");

        let bare = ApiError::Rejected { status: 500, message: String::new() };
        assert_eq!(bare.user_message(), PREDICT_FALLBACK_MESSAGE);

        let transport = ApiError::Transport("connection refused".to_string());
        assert_eq!(transport.user_message(), PREDICT_FALLBACK_MESSAGE);
    }
}

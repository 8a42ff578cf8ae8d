//! HTTP adapter for the prediction service.
//!
//! Blocking reqwest client; callers run it off the render thread (see
//! `tui::worker`). The base URL comes from `STROKEWATCH_API_URL` and
//! defaults to the local loopback origin the service binds by default.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{PatientRecord, Prediction};
use crate::ports::{ApiError, ApiHealth, ModelInfo, PredictionApi, StatsReport};

/// Default origin of the prediction service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error payload the service attaches to non-success responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Vec<String>>,
}

/// reqwest-backed implementation of [`PredictionApi`].
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client against the given origin.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// Create a client from `STROKEWATCH_API_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("STROKEWATCH_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(transport)?;
        decode_success(response)
    }
}

impl PredictionApi for HttpApi {
    fn health(&self) -> ApiHealth {
        match self.client.get(self.url("/api/health")).send() {
            Ok(response) if response.status().is_success() => ApiHealth::Healthy,
            Ok(response) => {
                tracing::debug!("health probe answered {}", response.status());
                ApiHealth::Unhealthy
            }
            Err(err) => {
                tracing::debug!("health probe failed: {err}");
                ApiHealth::Disconnected
            }
        }
    }

    fn model_info(&self) -> Result<ModelInfo, ApiError> {
        self.get_json("/api/model-info")
    }

    fn predict(&self, patient: &PatientRecord) -> Result<Prediction, ApiError> {
        let response = self
            .client
            .post(self.url("/api/predict"))
            .json(patient)
            .send()
            .map_err(transport)?;
        decode_success(response)
    }

    fn stats(&self) -> Result<StatsReport, ApiError> {
        self.get_json("/api/stats")
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body: ErrorBody = response.json().unwrap_or_default();
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: resolve_error_message(&body),
        });
    }

    response.json().map_err(|err| ApiError::Decode(err.to_string()))
}

/// Prefer the structured per-field details over the generic error string.
fn resolve_error_message(body: &ErrorBody) -> String {
    if let Some(details) = &body.details {
        if !details.is_empty() {
            return details.join(", ");
        }
    }
    body.error.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_details() {
        let body = ErrorBody {
            error: Some("Validation failed".to_string()),
            details: Some(vec![
                "BMI out of range".to_string(),
                "age must be between 18 and 120".to_string(),
            ]),
        };
        assert_eq!(
            resolve_error_message(&body),
            "BMI out of range, age must be between 18 and 120"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_error_string() {
        let body = ErrorBody {
            error: Some("Internal server error".to_string()),
            details: Some(Vec::new()),
        };
        assert_eq!(resolve_error_message(&body), "Internal server error");

        let empty = ErrorBody::default();
        assert_eq!(resolve_error_message(&empty), "");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:5000/").expect("should build");
        assert_eq!(api.url("/api/health"), "http://localhost:5000/api/health");
    }
}

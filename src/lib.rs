//! # StrokeWatch
//!
//! Terminal client for a stroke-risk prediction service.
//!
//! This crate provides:
//! - An intake form for patient vitals with client-side range validation
//! - Submission to a remote prediction API and inline result display
//! - A session-local history of past assessments
//! - Aggregate statistics and a periodic service health probe
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient record, prediction result, risk level)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (reqwest HTTP client)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PatientRecord, Prediction, PredictionRecord, RiskLevel, SmokingStatus};

/// Result type for StrokeWatch operations
pub type Result<T> = std::result::Result<T, StrokewatchError>;

/// Main error type for StrokeWatch
#[derive(Debug, thiserror::Error)]
pub enum StrokewatchError {
    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ports::ApiError),
}

impl StrokewatchError {
    /// Most specific message available for inline display: validation text
    /// verbatim, server-reported detail for API rejections, a fixed fallback
    /// for transport and decode failures.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api(err) => err.user_message(),
        }
    }
}

//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the remote prediction service.

mod api;

pub use api::{
    ApiError, ApiHealth, ModelInfo, ModelSummary, PredictionApi, RiskCounts, StatsReport,
    PREDICT_FALLBACK_MESSAGE,
};

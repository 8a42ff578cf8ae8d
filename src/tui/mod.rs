//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - Patient intake form with inline assessment results
//! - Session history of past predictions
//! - Aggregate statistics view
//! - Service health indicator driven by a periodic probe

pub mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::ClinicTheme;
pub use worker::{
    HealthMonitor, HealthMonitorHandle, ModelInfoWorker, PredictOutcome, PredictWorker,
    RequestHandle, StatsMessage, StatsWorker, HEALTH_PROBE_INTERVAL,
};

//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest-backed client for the prediction service

pub mod http;

pub use http::HttpApi;

//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted application settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent and bounded response reads.
pub mod http_client;
/// Logging setup.
pub mod logging;
/// Prediction service client.
pub mod predict;
/// Classification report formatting.
pub mod report;

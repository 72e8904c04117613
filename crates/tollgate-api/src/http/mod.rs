//! HTTP surface modules (router, handlers, middleware).

/// Shared constants and header names.
pub(crate) mod constants;
/// Problem response helpers and error types.
pub(crate) mod errors;
/// Health and metrics endpoints.
pub(crate) mod health;
/// Log content endpoints.
pub(crate) mod log_content;
/// Runtime option endpoints.
pub(crate) mod options;
/// Router construction and server host.
pub mod router;
/// Self-hosted diagnostics endpoints.
pub mod system;
/// Request context and per-route counting middleware.
pub(crate) mod telemetry;

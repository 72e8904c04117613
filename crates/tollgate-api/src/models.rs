//! Request and response documents for the administrative API.

use serde::{Deserialize, Serialize};
use tollgate_config::OptionValue;
use tollgate_telemetry::MetricsSnapshot;

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    /// Detailed diagnostic message when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Parameters that failed validation, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
    /// Matched route that produced the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// `x-request-id` of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON Pointer to the offending field.
    pub pointer: String,
    /// Human-readable description of the validation failure.
    pub message: String,
}

/// Body accepted by `PUT /api/option`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionUpdateRequest {
    /// Option key to write.
    pub key: String,
    /// Boolean, number, or string value.
    pub value: OptionValue,
}

/// Result of an accepted option write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionUpdateResponse {
    /// Option key written.
    pub key: String,
    /// Normalized value now stored.
    pub value: String,
}

/// Count of rows removed by a delete call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedResponse {
    /// Number of rows removed.
    pub deleted: u64,
}

/// Liveness payload returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Build identifier.
    pub build: String,
    /// Selected counters.
    pub metrics: MetricsSnapshot,
}

/// One supported environment variable that is currently set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVariable {
    /// Variable name.
    pub key: String,
    /// Value, masked for secrets.
    pub value: String,
    /// What the variable controls.
    pub description: String,
    /// Display grouping.
    pub category: String,
}

/// Database connection summary derived from the configured DSN.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    /// `postgresql`, `mysql`, or `sqlite`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server host, empty for `SQLite`.
    pub host: String,
    /// Server port, zero for `SQLite`.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Connecting user.
    pub username: String,
    /// `SQLite` file path as configured.
    pub path: String,
    /// `SQLite` file path made absolute.
    pub full_path: String,
}

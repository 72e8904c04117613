//! Environment-driven process settings.
//!
//! Runtime options live in the database; this module only covers what the
//! process needs before it can reach the database.

use std::net::SocketAddr;
use std::time::Duration;

use tollgate_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::error::{AppError, AppResult};

/// Listen address used when `TOLLGATE_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Rows pruned per retention pass when `LOG_CONTENT_PRUNE_BATCH` is unset.
pub const DEFAULT_PRUNE_BATCH: i64 = 1000;

const SECONDS_PER_DAY: u64 = 86_400;

/// Settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Postgres connection string.
    pub database_url: String,
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// Whether request/response bodies are persisted.
    pub log_contents: bool,
    /// Age after which captured bodies are pruned; `None` disables pruning.
    pub retention: Option<Duration>,
    /// Maximum log records pruned per pass.
    pub prune_batch: i64,
    /// Whether self-hosted diagnostics are served.
    pub self_hosted: bool,
    /// Log level or filter directive.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppSettings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` is missing or a value cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` is missing or a value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_url = read("DATABASE_URL").ok_or(AppError::MissingEnv {
            name: "DATABASE_URL",
        })?;

        let bind_raw = read("TOLLGATE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| AppError::InvalidConfig {
                field: "TOLLGATE_BIND_ADDR",
                reason: "unparseable",
                value: Some(bind_raw.clone()),
            })?;

        let retention = match read("LOG_CONTENT_RETENTION_DAYS") {
            None => None,
            Some(raw) => {
                let days = raw.parse::<u64>().map_err(|_| AppError::InvalidConfig {
                    field: "LOG_CONTENT_RETENTION_DAYS",
                    reason: "not_a_number",
                    value: Some(raw.clone()),
                })?;
                (days > 0).then(|| Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
            }
        };

        let prune_batch = match read("LOG_CONTENT_PRUNE_BATCH") {
            None => DEFAULT_PRUNE_BATCH,
            Some(raw) => match raw.parse::<i64>() {
                Ok(batch) if batch > 0 => batch,
                _ => {
                    return Err(AppError::InvalidConfig {
                        field: "LOG_CONTENT_PRUNE_BATCH",
                        reason: "not_positive",
                        value: Some(raw),
                    });
                }
            },
        };

        let log_format = match read("TOLLGATE_LOG_FORMAT") {
            None => LogFormat::infer(),
            Some(raw) => raw.parse().map_err(|()| AppError::InvalidConfig {
                field: "TOLLGATE_LOG_FORMAT",
                reason: "unknown_format",
                value: Some(raw.clone()),
            })?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            log_contents: flag_value(read("LOG_CONTENTS").as_deref()),
            retention,
            prune_batch,
            self_hosted: flag_value(read("SELF_HOSTED_MODE").as_deref()),
            log_level: read("TOLLGATE_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
        })
    }
}

fn flag_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

//! Error types for runtime option operations.

use std::error::Error as StdError;

use thiserror::Error;

/// Primary error type for runtime option operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A key-specific rule refused the candidate value; the store is unchanged.
    #[error("option value rejected")]
    ValidationFailed {
        /// Option key the write targeted.
        key: String,
        /// Human-readable reason surfaced to the caller.
        reason: String,
    },
    /// The value is visible in memory but the durable write failed.
    #[error("option persisted in memory only")]
    PersistenceFailed {
        /// Option key the write targeted.
        key: String,
        /// Failure reported by the durability sink.
        source: SinkError,
    },
    /// Underlying database operation failed.
    #[error("database operation failed")]
    Database {
        /// Operation identifier.
        operation: &'static str,
        /// Source database error.
        source: sqlx::Error,
    },
    /// Data layer operation failed.
    #[error("data access failed")]
    DataAccess {
        /// Operation identifier.
        operation: &'static str,
        /// Source data-layer error.
        source: tollgate_data::DataError,
    },
}

impl ConfigError {
    /// Reason text for validation failures, if this is one.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure reported by an [`OptionSink`](crate::OptionSink) implementation.
#[derive(Debug, Error)]
#[error("option sink write failed")]
pub struct SinkError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl SinkError {
    /// Wrap any error raised by a sink backend.
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_exposes_reason() {
        let err = ConfigError::ValidationFailed {
            key: "GroupRatio".into(),
            reason: "expected value at line 1 column 2".into(),
        };
        assert_eq!(err.to_string(), "option value rejected");
        assert_eq!(
            err.rejection_reason(),
            Some("expected value at line 1 column 2")
        );
    }

    #[test]
    fn persistence_failure_keeps_sink_source() {
        let err = ConfigError::PersistenceFailed {
            key: "Notice".into(),
            source: SinkError::new("disk full"),
        };
        assert!(err.rejection_reason().is_none());
        let sink = err.source().expect("sink error attached");
        assert_eq!(sink.to_string(), "option sink write failed");
        assert_eq!(
            sink.source().map(ToString::to_string).as_deref(),
            Some("disk full")
        );
    }
}

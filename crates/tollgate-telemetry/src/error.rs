//! Failures raised while installing logging or exposing metrics.

use prometheus::Error as PrometheusError;
use thiserror::Error;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Step of metric setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStage {
    /// Building the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

/// Telemetry failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global tracing subscriber was already installed or could not be set.
    #[error("logging already initialised")]
    LoggingInstall {
        /// Subscriber installation error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// One of the gateway metrics could not be set up.
    #[error("metric setup failed")]
    MetricSetup {
        /// Metric name, e.g. `option_updates_total`.
        name: &'static str,
        /// Setup step that failed.
        stage: MetricStage,
        /// Prometheus error.
        source: PrometheusError,
    },
    /// The `/metrics` exposition could not be encoded.
    #[error("metrics exposition failed")]
    Exposition {
        /// Prometheus encoder error.
        source: PrometheusError,
    },
    /// The text exposition contained invalid UTF-8.
    #[error("metrics exposition was not utf-8")]
    ExpositionText {
        /// Conversion error.
        source: std::string::FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn metric_setup_names_metric_and_stage() {
        let err = TelemetryError::MetricSetup {
            name: "log_content_pruned_total",
            stage: MetricStage::Register,
            source: PrometheusError::AlreadyReg,
        };
        assert_eq!(err.to_string(), "metric setup failed");
        assert!(matches!(
            err,
            TelemetryError::MetricSetup {
                name: "log_content_pruned_total",
                stage: MetricStage::Register,
                ..
            }
        ));
        assert!(err.source().is_some());
    }

    #[test]
    fn exposition_failures_keep_their_cause() {
        let Err(utf8) = String::from_utf8(vec![0xff, 0xfe]) else {
            panic!("invalid bytes decoded");
        };
        let text = TelemetryError::ExpositionText { source: utf8 };
        assert_eq!(text.to_string(), "metrics exposition was not utf-8");
        assert!(text.source().is_some());

        let encode = TelemetryError::Exposition {
            source: PrometheusError::Msg("closed".to_string()),
        };
        assert_eq!(encode.to_string(), "metrics exposition failed");
    }
}

//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Collector registration stays private; callers only see typed recorders.
//! - Counters cover the administrative surface: option writes, content lookups, pruning.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{MetricStage, Result, TelemetryError};

/// Result of an attempted option write, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionUpdateOutcome {
    /// Value accepted and persisted.
    Applied,
    /// Value refused by a validator.
    Rejected,
    /// Value applied in memory but the durable write failed.
    PersistFailed,
}

impl OptionUpdateOutcome {
    /// Label value recorded for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Rejected => "rejected",
            Self::PersistFailed => "persist_failed",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    option_updates_total: IntCounterVec,
    log_content_lookups_total: IntCounterVec,
    log_content_pruned_total: IntCounter,
    options_loaded: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Option writes that were applied and persisted.
    pub option_updates_applied: u64,
    /// Option writes refused by validation.
    pub option_updates_rejected: u64,
    /// Option writes whose durable write failed.
    pub option_updates_persist_failed: u64,
    /// Total log content rows removed by pruning.
    pub log_content_pruned_total: u64,
    /// Number of options held in memory.
    pub options_loaded: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let option_updates_total = counter_vec(
            "option_updates_total",
            "Runtime option writes by outcome",
            &["outcome"],
        )?;
        let log_content_lookups_total = counter_vec(
            "log_content_lookups_total",
            "Log content lookups by outcome",
            &["outcome"],
        )?;
        let log_content_pruned_total = IntCounter::with_opts(Opts::new(
            "log_content_pruned_total",
            "Log content rows removed by retention pruning",
        ))
        .map_err(|source| TelemetryError::MetricSetup {
            name: "log_content_pruned_total",
            stage: MetricStage::Build,
            source,
        })?;
        let options_loaded = IntGauge::with_opts(Opts::new(
            "options_loaded",
            "Runtime options held in memory",
        ))
        .map_err(|source| TelemetryError::MetricSetup {
            name: "options_loaded",
            stage: MetricStage::Build,
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "option_updates_total", &option_updates_total)?;
        register(
            &registry,
            "log_content_lookups_total",
            &log_content_lookups_total,
        )?;
        register(&registry, "log_content_pruned_total", &log_content_pruned_total)?;
        register(&registry, "options_loaded", &options_loaded)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                option_updates_total,
                log_content_lookups_total,
                log_content_pruned_total,
                options_loaded,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record the outcome of an option write.
    pub fn inc_option_update(&self, outcome: OptionUpdateOutcome) {
        self.inner
            .option_updates_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Record a log content lookup; `found` selects the outcome label.
    pub fn inc_log_content_lookup(&self, found: bool) {
        let outcome = if found { "found" } else { "missing" };
        self.inner
            .log_content_lookups_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Add pruned log content rows to the running total.
    pub fn add_log_content_pruned(&self, rows: u64) {
        self.inner.log_content_pruned_total.inc_by(rows);
    }

    /// Set the number of options currently held in memory.
    pub fn set_options_loaded(&self, count: usize) {
        self.inner
            .options_loaded
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::Exposition { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::ExpositionText { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let updates = |outcome: OptionUpdateOutcome| {
            self.inner
                .option_updates_total
                .with_label_values(&[outcome.as_str()])
                .get()
        };
        MetricsSnapshot {
            option_updates_applied: updates(OptionUpdateOutcome::Applied),
            option_updates_rejected: updates(OptionUpdateOutcome::Rejected),
            option_updates_persist_failed: updates(OptionUpdateOutcome::PersistFailed),
            log_content_pruned_total: self.inner.log_content_pruned_total.get(),
            options_loaded: self.inner.options_loaded.get(),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricSetup {
            name,
            stage: MetricStage::Build,
            source,
        })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricSetup {
            name,
            stage: MetricStage::Register,
            source,
        })
}

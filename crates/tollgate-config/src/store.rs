//! In-memory option store with validated, write-through updates.
//!
//! # Design
//! - A single `RwLock` covers the whole map; readers share it, writers hold it
//!   only for the insert itself.
//! - A separate write gate serializes the validate, insert, and persist steps of
//!   concurrent writers so prerequisite checks and durable writes never interleave.
//! - Readers never wait on the durability sink.
//! - A failed sink call leaves the in-memory value in place and reports
//!   [`ConfigError::PersistenceFailed`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult, SinkError};
use crate::redact;
use crate::validate::ValidatorRegistry;
use crate::value::OptionValue;

/// Durable record-per-key storage invoked after every accepted write.
#[async_trait]
pub trait OptionSink: Send + Sync {
    /// Persist the normalized `value` for `key`.
    async fn persist(&self, key: &str, value: &str) -> Result<(), SinkError>;
}

/// A single key/value pair as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    /// Option key.
    pub key: String,
    /// Canonical textual value.
    pub value: String,
}

impl OptionEntry {
    /// Build an entry from borrowed parts.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Shared handle to the runtime option map.
#[derive(Clone)]
pub struct OptionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    options: RwLock<HashMap<String, String>>,
    write_gate: Mutex<()>,
    validators: ValidatorRegistry,
    sink: Arc<dyn OptionSink>,
}

impl OptionStore {
    /// Build a ready store from seed values.
    #[must_use]
    pub fn new(
        seed: HashMap<String, String>,
        validators: ValidatorRegistry,
        sink: Arc<dyn OptionSink>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                options: RwLock::new(seed),
                write_gate: Mutex::new(()),
                validators,
                sink,
            }),
        }
    }

    /// Point-in-time copy of every option, sorted by key.
    pub async fn get_all(&self) -> Vec<OptionEntry> {
        let mut entries: Vec<OptionEntry> = {
            let options = self.inner.options.read().await;
            options
                .iter()
                .map(|(key, value)| OptionEntry::new(key.as_str(), value.as_str()))
                .collect()
        };
        entries.sort_unstable_by(|left, right| left.key.cmp(&right.key));
        entries
    }

    /// Current value for `key`, if present.
    pub async fn get_one(&self, key: &str) -> Option<String> {
        self.inner.options.read().await.get(key).cloned()
    }

    /// Every option except secret-bearing keys, sorted by key.
    pub async fn export(&self) -> Vec<OptionEntry> {
        redact::redact(self.get_all().await)
    }

    /// Number of options currently held.
    pub async fn len(&self) -> usize {
        self.inner.options.read().await.len()
    }

    /// Whether the store holds no options.
    pub async fn is_empty(&self) -> bool {
        self.inner.options.read().await.is_empty()
    }

    /// Normalize, validate, apply, and persist a single option value.
    ///
    /// Returns the normalized value on success.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ValidationFailed`] when a rule refuses the value; nothing changes.
    /// - [`ConfigError::PersistenceFailed`] when the sink fails; the new value
    ///   stays visible in memory.
    pub async fn set_validated(
        &self,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> ConfigResult<String> {
        let normalized = value.into().normalize();
        let _gate = self.inner.write_gate.lock().await;

        {
            let options = self.inner.options.read().await;
            self.inner
                .validators
                .validate(key, &normalized, &*options)
                .map_err(|reason| {
                    debug!(key, %reason, "option value rejected");
                    ConfigError::ValidationFailed {
                        key: key.to_string(),
                        reason,
                    }
                })?;
        }

        self.inner
            .options
            .write()
            .await
            .insert(key.to_string(), normalized.clone());

        if let Err(source) = self.inner.sink.persist(key, &normalized).await {
            warn!(key, error = %source, "option applied in memory but not persisted");
            return Err(ConfigError::PersistenceFailed {
                key: key.to_string(),
                source,
            });
        }

        debug!(key, "option updated");
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingSink {
        writes: StdMutex<Vec<(String, String)>>,
        fail: AtomicBool,
    }

    impl RecordingSink {
        fn writes(&self) -> Vec<(String, String)> {
            self.writes.lock().expect("sink lock").clone()
        }
    }

    #[async_trait]
    impl OptionSink for RecordingSink {
        async fn persist(&self, key: &str, value: &str) -> Result<(), SinkError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SinkError::new("sink offline"));
            }
            self.writes
                .lock()
                .expect("sink lock")
                .push((key.to_string(), value.to_string()));
            Ok(())
        }
    }

    fn store_with(seed: &[(&str, &str)]) -> (OptionStore, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let seed = seed
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        let store = OptionStore::new(seed, ValidatorRegistry::standard(), sink.clone());
        (store, sink)
    }

    #[tokio::test]
    async fn writes_are_normalized_and_persisted() {
        let (store, sink) = store_with(&[]);
        store.set_validated("RetryTimes", 42_i64).await.expect("write");
        store.set_validated("LogConsumeEnabled", true).await.expect("write");
        store.set_validated("QuotaPerUnit", 0.5_f64).await.expect("write");

        assert_eq!(store.get_one("RetryTimes").await.as_deref(), Some("42"));
        assert_eq!(store.get_one("LogConsumeEnabled").await.as_deref(), Some("true"));
        assert_eq!(store.get_one("QuotaPerUnit").await.as_deref(), Some("0.5"));
        assert_eq!(
            sink.writes(),
            vec![
                ("RetryTimes".to_string(), "42".to_string()),
                ("LogConsumeEnabled".to_string(), "true".to_string()),
                ("QuotaPerUnit".to_string(), "0.5".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn group_ratio_rejection_keeps_prior_value() {
        let (store, sink) = store_with(&[(keys::GROUP_RATIO, "{\"default\":1}")]);
        let err = store
            .set_validated(keys::GROUP_RATIO, "{invalid")
            .await
            .unwrap_err();
        let reason = err.rejection_reason().expect("validation failure");
        assert!(reason.contains("line 1"), "parse error surfaced: {reason}");
        assert_eq!(
            store.get_one(keys::GROUP_RATIO).await.as_deref(),
            Some("{\"default\":1}")
        );
        assert!(sink.writes().is_empty());

        store
            .set_validated(keys::GROUP_RATIO, "{\"default\":1.0}")
            .await
            .expect("valid ratio table");
        assert_eq!(
            store.get_one(keys::GROUP_RATIO).await.as_deref(),
            Some("{\"default\":1.0}")
        );
    }

    #[tokio::test]
    async fn prerequisite_reads_current_store_value() {
        let (store, _sink) = store_with(&[(keys::TELEGRAM_BOT_TOKEN, "")]);
        assert!(matches!(
            store.set_validated(keys::TELEGRAM_OAUTH_ENABLED, true).await,
            Err(ConfigError::ValidationFailed { .. })
        ));
        store
            .set_validated(keys::TELEGRAM_OAUTH_ENABLED, false)
            .await
            .expect("disabling is always allowed");

        store
            .set_validated(keys::TELEGRAM_BOT_TOKEN, "123:abc")
            .await
            .expect("token");
        store
            .set_validated(keys::TELEGRAM_OAUTH_ENABLED, true)
            .await
            .expect("enabled once prerequisite is stored");
    }

    #[tokio::test]
    async fn whitespace_prerequisite_counts_as_configured() {
        let (store, sink) = store_with(&[(keys::GITHUB_CLIENT_ID, "  ")]);
        let stored = store
            .set_validated(keys::GITHUB_OAUTH_ENABLED, true)
            .await
            .expect("non-empty prerequisite");
        assert_eq!(stored, "true");
        assert_eq!(
            sink.writes(),
            vec![(keys::GITHUB_OAUTH_ENABLED.to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn sink_failure_reports_without_rollback() {
        let (store, sink) = store_with(&[("Notice", "old")]);
        sink.fail.store(true, Ordering::SeqCst);
        let err = store.set_validated("Notice", "new").await.unwrap_err();
        assert!(matches!(err, ConfigError::PersistenceFailed { ref key, .. } if key == "Notice"));
        assert_eq!(store.get_one("Notice").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn export_hides_sensitive_keys_but_get_one_does_not() {
        let (store, _sink) = store_with(&[
            (keys::GITHUB_CLIENT_SECRET, "s3cr3t"),
            (keys::GITHUB_CLIENT_ID, "client"),
            ("SystemName", "Tollgate"),
        ]);
        let exported = store.export().await;
        assert_eq!(
            exported,
            vec![
                OptionEntry::new(keys::GITHUB_CLIENT_ID, "client"),
                OptionEntry::new("SystemName", "Tollgate"),
            ]
        );
        assert_eq!(
            store.get_one(keys::GITHUB_CLIENT_SECRET).await.as_deref(),
            Some("s3cr3t")
        );
        assert_eq!(store.get_all().await.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_disjoint_writers_lose_no_updates() {
        let (store, sink) = store_with(&[]);
        let mut tasks = Vec::new();
        for writer in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for round in 0..25_i64 {
                    store
                        .set_validated(&format!("writer.{writer}"), round)
                        .await
                        .expect("write");
                }
            }));
        }
        for task in tasks {
            task.await.expect("writer task");
        }

        let all = store.get_all().await;
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|entry| entry.value == "24"));
        assert_eq!(sink.writes().len(), 8 * 25);
        assert_eq!(store.len().await, 8);
        assert!(!store.is_empty().await);
    }
}

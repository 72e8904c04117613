//! Background pruning of captured log bodies.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tollgate_api::SharedLogContents;
use tollgate_data::DataResult;
use tollgate_telemetry::Metrics;
use tracing::{info, warn};

/// Interval between retention passes.
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Age-based pruning policy for captured bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Captured bodies older than this are removed.
    pub max_age: Duration,
    /// Maximum log records considered per pass.
    pub batch: i64,
}

impl RetentionPolicy {
    /// Unix-second cutoff for a pass that runs at `now`.
    #[must_use]
    pub fn cutoff(&self, now: i64) -> i64 {
        let age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        now.saturating_sub(age)
    }
}

/// Run a single retention pass and record the removed rows.
///
/// # Errors
///
/// Returns the storage error when the delete fails.
pub async fn prune_once(
    contents: &SharedLogContents,
    telemetry: &Metrics,
    policy: RetentionPolicy,
    now: i64,
) -> DataResult<u64> {
    let cutoff = policy.cutoff(now);
    let deleted = contents.delete_older_than(cutoff, policy.batch).await?;
    telemetry.add_log_content_pruned(deleted);
    Ok(deleted)
}

/// Spawn the hourly retention loop.
///
/// The first pass runs immediately. Failures are logged and retried on the
/// next tick.
#[must_use]
pub fn spawn_retention_task(
    contents: SharedLogContents,
    telemetry: Metrics,
    policy: RetentionPolicy,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match prune_once(&contents, &telemetry, policy, Utc::now().timestamp()).await {
                Ok(0) => {}
                Ok(deleted) => info!(deleted, "pruned expired log content"),
                Err(err) => warn!(error = %err, "log content retention pass failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use anyhow::Result;
    use async_trait::async_trait;
    use tollgate_api::LogContentFacade;
    use tollgate_data::{DataError, LogContent};

    #[derive(Default)]
    struct RecordingContents {
        calls: Mutex<Vec<(i64, i64)>>,
        fail: bool,
    }

    #[async_trait]
    impl LogContentFacade for RecordingContents {
        async fn get_by_log_id(&self, _log_id: i64) -> DataResult<LogContent> {
            Err(DataError::NotFound {
                operation: "get log content",
            })
        }

        async fn delete_by_log_id(&self, _log_id: i64) -> DataResult<u64> {
            Ok(0)
        }

        async fn delete_older_than(&self, cutoff: i64, limit: i64) -> DataResult<u64> {
            if self.fail {
                return Err(DataError::QueryFailed {
                    operation: "delete expired log content",
                    source: sqlx::Error::PoolTimedOut,
                });
            }
            self.calls
                .lock()
                .map_err(|_| DataError::NotFound {
                    operation: "record prune call",
                })?
                .push((cutoff, limit));
            Ok(3)
        }
    }

    const WEEK: RetentionPolicy = RetentionPolicy {
        max_age: Duration::from_secs(7 * 86_400),
        batch: 500,
    };

    #[test]
    fn cutoff_subtracts_max_age() {
        assert_eq!(WEEK.cutoff(1_000_000), 1_000_000 - 604_800);
        assert_eq!(WEEK.cutoff(i64::MIN), i64::MIN);
    }

    #[tokio::test]
    async fn prune_once_passes_cutoff_and_batch() -> Result<()> {
        let recorder = Arc::new(RecordingContents::default());
        let contents: SharedLogContents = recorder.clone();
        let telemetry = Metrics::new()?;

        let deleted = prune_once(&contents, &telemetry, WEEK, 2_000_000).await?;

        assert_eq!(deleted, 3);
        let calls = recorder
            .calls
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?
            .clone();
        assert_eq!(calls, vec![(2_000_000 - 604_800, 500)]);
        assert_eq!(telemetry.snapshot().log_content_pruned_total, 3);
        Ok(())
    }

    #[tokio::test]
    async fn prune_once_surfaces_storage_errors() -> Result<()> {
        let contents: SharedLogContents = Arc::new(RecordingContents {
            fail: true,
            ..RecordingContents::default()
        });
        let telemetry = Metrics::new()?;

        let result = prune_once(&contents, &telemetry, WEEK, 2_000_000).await;

        assert!(matches!(result, Err(DataError::QueryFailed { .. })));
        assert_eq!(telemetry.snapshot().log_content_pruned_total, 0);
        Ok(())
    }
}

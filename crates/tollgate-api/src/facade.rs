//! Log content abstraction used by HTTP handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tollgate_data::{DataResult, LogContent, LogContentStore};

/// Read/delete access to captured request and response bodies.
#[async_trait]
pub trait LogContentFacade: Send + Sync {
    /// Fetch content for `log_id`; absent rows surface as `DataError::NotFound`.
    async fn get_by_log_id(&self, log_id: i64) -> DataResult<LogContent>;
    /// Delete content for `log_id`, returning the affected row count.
    async fn delete_by_log_id(&self, log_id: i64) -> DataResult<u64>;
    /// Delete content of up to `limit` log records created before `cutoff`.
    async fn delete_older_than(&self, cutoff: i64, limit: i64) -> DataResult<u64>;
}

/// Shared reference to the log content backend.
pub type SharedLogContents = Arc<dyn LogContentFacade>;

#[async_trait]
impl LogContentFacade for LogContentStore {
    async fn get_by_log_id(&self, log_id: i64) -> DataResult<LogContent> {
        Self::get_by_log_id(self, log_id).await
    }

    async fn delete_by_log_id(&self, log_id: i64) -> DataResult<u64> {
        Self::delete_by_log_id(self, log_id).await
    }

    async fn delete_older_than(&self, cutoff: i64, limit: i64) -> DataResult<u64> {
        Self::delete_older_than(self, cutoff, limit).await
    }
}

//! Secondary store for large relay request/response bodies.
//!
//! # Design
//! - Rows are keyed by the owning log record id; uniqueness is not enforced.
//! - The table is created once at startup, and `create` repairs a missing table
//!   exactly once before giving up.
//! - Age-based pruning resolves parent ids through [`LogRecordIndex`] and then
//!   deletes content in a second, non-transactional statement.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{error, info, instrument};

use crate::error::{DataError, Result, classify_table_err, map_query_err};

const TABLE: &str = "log_contents";

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS log_contents (
        log_id BIGINT NOT NULL,
        request_body TEXT NOT NULL DEFAULT '',
        response_body TEXT NOT NULL DEFAULT ''
    )
";

const CREATE_INDEX: &str =
    r"CREATE INDEX IF NOT EXISTS log_contents_log_id_idx ON log_contents (log_id)";

const INSERT_CONTENT: &str = r"
    INSERT INTO log_contents (log_id, request_body, response_body)
    VALUES ($1, $2, $3)
";

const SELECT_CONTENT: &str = r"
    SELECT log_id, request_body, response_body
    FROM log_contents
    WHERE log_id = $1
    LIMIT 1
";

const DELETE_CONTENT: &str = r"DELETE FROM log_contents WHERE log_id = $1";

const DELETE_CONTENT_MANY: &str = r"DELETE FROM log_contents WHERE log_id = ANY($1)";

const SELECT_OLD_LOG_IDS: &str = r"
    SELECT id
    FROM logs
    WHERE created_at < $1
    ORDER BY id
    LIMIT $2
";

/// Request/response bodies captured for a single relay log record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct LogContent {
    /// Identifier of the owning log record.
    pub log_id: i64,
    /// Upstream request body.
    pub request_body: String,
    /// Upstream response body.
    pub response_body: String,
}

/// Lookup of parent log record identifiers by age.
#[async_trait]
pub trait LogRecordIndex: Send + Sync {
    /// Return at most `limit` ids of log records created before `cutoff` (unix seconds).
    async fn ids_older_than(&self, cutoff: i64, limit: i64) -> Result<Vec<i64>>;
}

/// [`LogRecordIndex`] backed by the `logs` table.
#[derive(Clone)]
pub struct PgLogRecordIndex {
    pool: PgPool,
}

impl PgLogRecordIndex {
    /// Build an index over the provided pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogRecordIndex for PgLogRecordIndex {
    async fn ids_older_than(&self, cutoff: i64, limit: i64) -> Result<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(SELECT_OLD_LOG_IDS)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_err("select expired log ids"))
    }
}

/// Database-backed repository for captured log bodies.
#[derive(Clone)]
pub struct LogContentStore {
    pool: PgPool,
    enabled: bool,
    index: Arc<dyn LogRecordIndex>,
}

impl LogContentStore {
    /// Create the store and make sure its table exists.
    ///
    /// When `enabled` is `false`, [`Self::create`] silently discards content;
    /// reads and deletes keep working so previously captured rows stay reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn new(pool: PgPool, enabled: bool) -> Result<Self> {
        let index = Arc::new(PgLogRecordIndex::new(pool.clone()));
        let store = Self {
            pool,
            enabled,
            index,
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Replace the parent-record index used by [`Self::delete_older_than`].
    #[must_use]
    pub fn with_index(mut self, index: Arc<dyn LogRecordIndex>) -> Self {
        self.index = index;
        self
    }

    /// Whether content capture is switched on.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `log_contents` table and its lookup index if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if either DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_query_err("create log_contents table"))?;
        sqlx::query(CREATE_INDEX)
            .execute(&self.pool)
            .await
            .map_err(map_query_err("create log_contents index"))?;
        Ok(())
    }

    /// Persist the bodies captured for `log_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including after one schema repair
    /// attempt when the table was missing.
    #[instrument(name = "log_content.create", skip(self, request_body, response_body))]
    pub async fn create(&self, log_id: i64, request_body: &str, response_body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        match self.insert(log_id, request_body, response_body).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_schema_missing() => {
                info!("log_contents table not found, attempting to create it");
                if let Err(err) = self.ensure_schema().await {
                    error!(error = %err, "failed to create log_contents table");
                    return Err(err);
                }
                self.insert(log_id, request_body, response_body)
                    .await
                    .map_err(|err| {
                        error!(error = %err, "failed to create log content");
                        match err {
                            DataError::SchemaMissing { source, .. } => DataError::QueryFailed {
                                operation: "insert log content",
                                source,
                            },
                            other => other,
                        }
                    })
            }
            Err(err) => {
                error!(error = %err, "failed to create log content");
                Err(err)
            }
        }
    }

    /// Fetch the content captured for `log_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] when no content exists, or a query error.
    pub async fn get_by_log_id(&self, log_id: i64) -> Result<LogContent> {
        sqlx::query_as::<_, LogContent>(SELECT_CONTENT)
            .bind(log_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_table_err("fetch log content", TABLE))?
            .ok_or(DataError::NotFound {
                operation: "fetch log content",
            })
    }

    /// Delete the content captured for `log_id`, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_by_log_id(&self, log_id: i64) -> Result<u64> {
        let result = sqlx::query(DELETE_CONTENT)
            .bind(log_id)
            .execute(&self.pool)
            .await
            .map_err(classify_table_err("delete log content", TABLE))?;
        Ok(result.rows_affected())
    }

    /// Delete content belonging to at most `limit` log records created before `cutoff`.
    ///
    /// Returns the number of content rows removed; zero when no parent record qualifies.
    ///
    /// # Errors
    ///
    /// Returns an error if the id lookup or the delete fails.
    #[instrument(name = "log_content.delete_older_than", skip(self))]
    pub async fn delete_older_than(&self, cutoff: i64, limit: i64) -> Result<u64> {
        if limit <= 0 {
            return Ok(0);
        }

        let log_ids = self.index.ids_older_than(cutoff, limit).await?;
        if log_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(DELETE_CONTENT_MANY)
            .bind(log_ids.as_slice())
            .execute(&self.pool)
            .await
            .map_err(classify_table_err("delete expired log content", TABLE))?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, log_id: i64, request_body: &str, response_body: &str) -> Result<()> {
        sqlx::query(INSERT_CONTENT)
            .bind(log_id)
            .bind(request_body)
            .bind(response_body)
            .execute(&self.pool)
            .await
            .map_err(classify_table_err("insert log content", TABLE))?;
        Ok(())
    }
}

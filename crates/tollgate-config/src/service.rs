//! Database-backed bootstrap for the runtime option store.
//!
//! # Design
//! - Migrations run before any option is read.
//! - The store is seeded from built-in defaults overlaid by persisted rows.
//! - Accepted writes flow back to the `options` table through [`PgOptionSink`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tollgate_data::{fetch_options, run_migrations, upsert_option};
use tracing::{info, instrument};

use crate::defaults::default_options;
use crate::error::{ConfigError, ConfigResult, SinkError};
use crate::store::{OptionSink, OptionStore};
use crate::validate::ValidatorRegistry;

/// Durability sink writing one `options` row per key.
#[derive(Clone)]
pub struct PgOptionSink {
    pool: PgPool,
}

impl PgOptionSink {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OptionSink for PgOptionSink {
    async fn persist(&self, key: &str, value: &str) -> Result<(), SinkError> {
        upsert_option(&self.pool, key, value)
            .await
            .map_err(SinkError::new)
    }
}

/// Owns the connection pool and the live option store.
#[derive(Clone)]
pub struct ConfigService {
    pool: PgPool,
    store: OptionStore,
}

impl ConfigService {
    /// Connect, migrate, and load the option store.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, migrations, or initial load fail.
    #[instrument(name = "config_service.new", skip(database_url))]
    pub async fn new(database_url: &str) -> ConfigResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|source| ConfigError::Database {
                operation: "connect",
                source,
            })?;
        Self::from_pool(pool).await
    }

    /// Migrate and load the option store on an existing pool.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations or the initial load fail.
    pub async fn from_pool(pool: PgPool) -> ConfigResult<Self> {
        run_migrations(&pool)
            .await
            .map_err(|source| ConfigError::DataAccess {
                operation: "run migrations",
                source,
            })?;

        let seed = load_seed(&pool).await?;
        info!(options = seed.len(), "runtime options loaded");
        let store = OptionStore::new(
            seed,
            ValidatorRegistry::standard(),
            Arc::new(PgOptionSink::new(pool.clone())),
        );
        Ok(Self { pool, store })
    }

    /// Live option store shared with request handlers.
    #[must_use]
    pub const fn store(&self) -> &OptionStore {
        &self.store
    }

    /// Access the underlying `SQLx` connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn load_seed(pool: &PgPool) -> ConfigResult<HashMap<String, String>> {
    let rows = fetch_options(pool)
        .await
        .map_err(|source| ConfigError::DataAccess {
            operation: "load options",
            source,
        })?;
    let mut seed = default_options();
    seed.extend(rows.into_iter().map(|row| (row.key, row.value)));
    Ok(seed)
}

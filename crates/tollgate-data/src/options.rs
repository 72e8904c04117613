//! Persistence for runtime option rows.

use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::error::{DataError, Result, map_query_err};

/// Apply all pending schema migrations.
///
/// # Errors
///
/// Returns an error when migration execution fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(true);
    migrator
        .run(pool)
        .await
        .map_err(|source| DataError::MigrationFailed { source })?;
    Ok(())
}

/// Raw projection of the `options` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OptionRow {
    /// Option key (case-sensitive).
    pub key: String,
    /// Stored textual value.
    pub value: String,
}

/// Load every persisted option row.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_options<'e, E>(executor: E) -> Result<Vec<OptionRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, OptionRow>("SELECT key, value FROM options ORDER BY key")
        .fetch_all(executor)
        .await
        .map_err(map_query_err("fetch options"))
}

/// Insert or replace a single option row.
///
/// # Errors
///
/// Returns an error when the statement fails.
pub async fn upsert_option<'e, E>(executor: E, key: &str, value: &str) -> Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r"
        INSERT INTO options (key, value, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                updated_at = EXCLUDED.updated_at
        ",
    )
    .bind(key)
    .bind(value)
    .execute(executor)
    .await
    .map_err(map_query_err("upsert option"))?;
    Ok(())
}

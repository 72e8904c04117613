//! Error types for the data access layer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for data layer operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Postgres SQLSTATE raised when a referenced relation does not exist.
const UNDEFINED_TABLE: &str = "42P01";

/// Errors raised by the data access layer.
#[derive(Debug)]
pub enum DataError {
    /// Migration execution failed.
    MigrationFailed {
        /// Underlying migration error.
        source: sqlx::migrate::MigrateError,
    },
    /// A database operation failed.
    QueryFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// The target table has not been created yet.
    SchemaMissing {
        /// Table that was missing.
        table: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// The requested record does not exist.
    NotFound {
        /// Operation identifier.
        operation: &'static str,
    },
}

impl DataError {
    /// Whether the error reports a missing table rather than a failed statement.
    #[must_use]
    pub const fn is_schema_missing(&self) -> bool {
        matches!(self, Self::SchemaMissing { .. })
    }

    /// Whether the error reports an absent record.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MigrationFailed { .. } => formatter.write_str("migration failed"),
            Self::QueryFailed { .. } => formatter.write_str("database operation failed"),
            Self::SchemaMissing { .. } => formatter.write_str("table does not exist"),
            Self::NotFound { .. } => formatter.write_str("record not found"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MigrationFailed { source } => Some(source),
            Self::QueryFailed { source, .. } | Self::SchemaMissing { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(source: sqlx::Error) -> Self {
        Self::QueryFailed {
            operation: "sqlx operation",
            source,
        }
    }
}

pub(crate) fn map_query_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DataError {
    move |source| DataError::QueryFailed { operation, source }
}

/// Classify a statement failure against `table`, separating "table absent" from other errors.
pub(crate) fn classify_table_err(
    operation: &'static str,
    table: &'static str,
) -> impl FnOnce(sqlx::Error) -> DataError {
    move |source| {
        if is_undefined_table(&source) {
            DataError::SchemaMissing { table, source }
        } else {
            DataError::QueryFailed { operation, source }
        }
    }
}

fn is_undefined_table(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNDEFINED_TABLE),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display_and_source() {
        let migration = DataError::MigrationFailed {
            source: sqlx::migrate::MigrateError::VersionMissing(1),
        };
        assert_eq!(migration.to_string(), "migration failed");
        assert!(migration.source().is_some());

        let query = DataError::QueryFailed {
            operation: "fetch",
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(query.to_string(), "database operation failed");
        assert!(query.source().is_some());

        let missing = DataError::SchemaMissing {
            table: "log_contents",
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(missing.to_string(), "table does not exist");
        assert!(missing.is_schema_missing());
        assert!(missing.source().is_some());

        let absent = DataError::NotFound {
            operation: "fetch log content",
        };
        assert_eq!(absent.to_string(), "record not found");
        assert!(absent.is_not_found());
        assert!(absent.source().is_none());

        let from = DataError::from(sqlx::Error::RowNotFound);
        assert_eq!(from.to_string(), "database operation failed");
        assert!(from.source().is_some());
    }

    #[test]
    fn non_database_errors_are_not_schema_missing() {
        let err = classify_table_err("insert", "log_contents")(sqlx::Error::PoolTimedOut);
        assert!(!err.is_schema_missing());
        assert!(matches!(
            err,
            DataError::QueryFailed {
                operation: "insert",
                ..
            }
        ));
    }
}

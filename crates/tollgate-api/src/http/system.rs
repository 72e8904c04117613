//! Self-hosted diagnostics: supported environment variables and database summary.
//!
//! Both views are captured once at startup and only served when the instance
//! runs in self-hosted mode.

use std::path::Path;
use std::sync::Arc;

use axum::{Json, extract::State};
use url::Url;

use crate::http::errors::ApiError;
use crate::models::{DatabaseInfo, EnvVariable};
use crate::state::ApiState;

const DEFAULT_SQLITE_PATH: &str = "tollgate.db";
const MASK: &str = "******";

struct EnvSpec {
    key: &'static str,
    description: &'static str,
    category: &'static str,
    secret: bool,
}

const SUPPORTED_ENV: &[EnvSpec] = &[
    EnvSpec {
        key: "TOLLGATE_BIND_ADDR",
        description: "HTTP listen address",
        category: "basic",
        secret: false,
    },
    EnvSpec {
        key: "SELF_HOSTED_MODE",
        description: "Expose self-hosted diagnostics",
        category: "basic",
        secret: false,
    },
    EnvSpec {
        key: "DATABASE_URL",
        description: "Database connection string",
        category: "database",
        secret: true,
    },
    EnvSpec {
        key: "SQLITE_PATH",
        description: "SQLite database path",
        category: "database",
        secret: false,
    },
    EnvSpec {
        key: "LOG_CONTENTS",
        description: "Capture request/response bodies",
        category: "debug",
        secret: false,
    },
    EnvSpec {
        key: "LOG_CONTENT_RETENTION_DAYS",
        description: "Days captured bodies are kept",
        category: "debug",
        secret: false,
    },
    EnvSpec {
        key: "LOG_CONTENT_PRUNE_BATCH",
        description: "Log records pruned per retention pass",
        category: "debug",
        secret: false,
    },
    EnvSpec {
        key: "TOLLGATE_LOG_LEVEL",
        description: "Log level or filter directive",
        category: "logging",
        secret: false,
    },
    EnvSpec {
        key: "TOLLGATE_LOG_FORMAT",
        description: "Log output format",
        category: "logging",
        secret: false,
    },
    EnvSpec {
        key: "RUST_LOG",
        description: "Log filter override",
        category: "logging",
        secret: false,
    },
];

/// Diagnostics captured from the process environment.
#[derive(Debug, Clone, Default)]
pub struct SystemInfo {
    self_hosted: bool,
    env: Vec<EnvVariable>,
    database: DatabaseInfo,
}

impl SystemInfo {
    /// Capture diagnostics from the current process environment.
    #[must_use]
    pub fn from_env(self_hosted: bool) -> Self {
        Self::capture(self_hosted, |key| std::env::var(key).ok())
    }

    /// Capture diagnostics using `lookup` to read variables.
    #[must_use]
    pub fn capture(self_hosted: bool, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = SUPPORTED_ENV
            .iter()
            .filter_map(|entry| {
                let value = lookup(entry.key).filter(|value| !value.is_empty())?;
                Some(EnvVariable {
                    key: entry.key.to_string(),
                    value: if entry.secret { mask_secret(&value) } else { value },
                    description: entry.description.to_string(),
                    category: entry.category.to_string(),
                })
            })
            .collect();
        let dsn = lookup("DATABASE_URL").unwrap_or_default();
        let sqlite_path = lookup("SQLITE_PATH");
        Self {
            self_hosted,
            env,
            database: database_info(&dsn, sqlite_path.as_deref()),
        }
    }
}

pub(crate) async fn env_variables(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<EnvVariable>>, ApiError> {
    if !state.system.self_hosted {
        return Err(ApiError::forbidden(
            "environment variables are only visible in self-hosted mode",
        ));
    }
    Ok(Json(state.system.env.clone()))
}

pub(crate) async fn database(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DatabaseInfo>, ApiError> {
    if !state.system.self_hosted {
        return Err(ApiError::forbidden(
            "database information is only visible in self-hosted mode",
        ));
    }
    Ok(Json(state.system.database.clone()))
}

/// Mask a secret, keeping four characters at each end of long values.
pub(crate) fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return MASK.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{MASK}{tail}")
}

pub(crate) fn database_info(dsn: &str, sqlite_path: Option<&str>) -> DatabaseInfo {
    if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
        return postgres_info(dsn);
    }
    if dsn.starts_with("mysql://") || dsn.contains("@tcp(") {
        return mysql_info(dsn);
    }
    sqlite_info(sqlite_path.unwrap_or(DEFAULT_SQLITE_PATH))
}

fn postgres_info(dsn: &str) -> DatabaseInfo {
    let mut info = DatabaseInfo {
        kind: "postgresql".to_string(),
        ..DatabaseInfo::default()
    };
    if let Ok(url) = Url::parse(dsn) {
        info.username = url.username().to_string();
        info.host = url.host_str().unwrap_or_default().to_string();
        info.port = url.port().unwrap_or(5432);
        info.database = url.path().trim_start_matches('/').to_string();
    }
    info
}

fn mysql_info(dsn: &str) -> DatabaseInfo {
    let mut info = DatabaseInfo {
        kind: "mysql".to_string(),
        ..DatabaseInfo::default()
    };
    let dsn = dsn.trim_start_matches("mysql://");
    let (user_info, host_info) = dsn.split_once('@').unwrap_or(("", dsn));
    info.username = user_info
        .split_once(':')
        .map_or(user_info, |(user, _)| user)
        .to_string();

    let Some(rest) = host_info.strip_prefix("tcp(") else {
        return info;
    };
    let Some((address, tail)) = rest.split_once(')') else {
        return info;
    };
    let database = tail.trim_start_matches('/');
    info.database = database
        .split_once('?')
        .map_or(database, |(name, _)| name)
        .to_string();
    match address.split_once(':') {
        Some((host, port)) => {
            info.host = host.to_string();
            info.port = port.parse().unwrap_or(0);
        }
        None => {
            info.host = address.to_string();
            info.port = 3306;
        }
    }
    info
}

fn sqlite_info(raw_path: &str) -> DatabaseInfo {
    let path = raw_path.split('?').next().unwrap_or_default().to_string();
    let full_path = std::path::absolute(Path::new(&path))
        .map_or_else(|_| path.clone(), |abs| abs.display().to_string());
    DatabaseInfo {
        kind: "sqlite".to_string(),
        path,
        full_path,
        ..DatabaseInfo::default()
    }
}

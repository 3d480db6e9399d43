//! Runtime configuration for the demo driver.
//!
//! # Responsibility
//! - Resolve database target and logging settings from environment variables.
//! - Open the configured database through `db::open_target`.
//!
//! # Invariants
//! - A blank or unset `CRUDDEMO_DB_PATH` selects an in-memory database.
//! - `log_level` is always one of the canonical level names.
//! - `log_dir`, when present, is absolute.

use crate::db::{open_target, DatabaseTarget, DbResult};
use crate::logging::{default_log_level, normalize_level, LoggingError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CRUDDEMO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CRUDDEMO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CRUDDEMO_LOG_DIR";

const MEMORY_DB_MARKER: &str = ":memory:";

/// Resolved settings for one demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseTarget,
    pub log_level: &'static str,
    /// File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str, source: LoggingError },
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, source } => write!(f, "invalid `{key}`: {source}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "`{LOG_DIR_ENV}` must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
            Self::RelativeLogDir(_) => None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseTarget::Memory,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let database = match value(DB_PATH_ENV) {
            Some(path) if path == MEMORY_DB_MARKER => DatabaseTarget::Memory,
            Some(path) => DatabaseTarget::File(PathBuf::from(path)),
            None => DatabaseTarget::Memory,
        };

        let log_level = match value(LOG_LEVEL_ENV) {
            Some(level) => normalize_level(&level).map_err(|source| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                source,
            })?,
            None => default_log_level(),
        };

        let log_dir = value(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }

        Ok(Self {
            database,
            log_level,
            log_dir,
        })
    }

    /// Opens and migrates the configured database.
    pub fn open_database(&self) -> DbResult<Connection> {
        open_target(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::db::DatabaseTarget;
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn db_path_selects_file_target_and_memory_marker_selects_memory() {
        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, " /tmp/students.db ")])).unwrap();
        assert_eq!(
            config.database,
            DatabaseTarget::File(PathBuf::from("/tmp/students.db"))
        );

        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, ":memory:")])).unwrap();
        assert_eq!(config.database, DatabaseTarget::Memory);

        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, "   ")])).unwrap();
        assert_eq!(config.database, DatabaseTarget::Memory);
    }

    #[test]
    fn log_level_is_normalized_and_validated() {
        let config = AppConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "WARNING")])).unwrap();
        assert_eq!(config.log_level, "warn");

        let err = AppConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                ..
            }
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs")])).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
    }

    #[test]
    fn open_database_honors_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.db");
        let config = AppConfig {
            database: DatabaseTarget::File(path.clone()),
            ..AppConfig::default()
        };

        let conn = config.open_database().unwrap();
        drop(conn);
        assert!(path.exists());
    }
}

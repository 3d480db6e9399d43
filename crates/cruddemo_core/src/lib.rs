//! Core of the student CRUD demo.
//! Owns the `Student` entity, its SQLite storage and the DAO facade over it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::DatabaseTarget;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{Student, StudentId};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentDao, StudentDao};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

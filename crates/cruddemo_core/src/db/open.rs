//! Connection bootstrap for the student database.
//!
//! # Responsibility
//! - Open a `DatabaseTarget` and configure the connection.
//! - Run migrations before handing the connection out.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DatabaseTarget, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file and applies pending migrations.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(&DatabaseTarget::File(path.as_ref().to_path_buf()))
}

/// Opens a private in-memory database and applies all migrations.
///
/// Every call yields an independent, empty store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(&DatabaseTarget::Memory)
}

/// Opens `target`, configures it and migrates it to the latest schema.
///
/// # Side effects
/// - Creates the file for `DatabaseTarget::File` when it does not exist.
/// - Emits `db_open` logging events with duration and status.
///
/// # Errors
/// - `DbError::Open` when the connection cannot be established or configured.
/// - Migration errors from `apply_migrations`.
pub fn open_target(target: &DatabaseTarget) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = connect(target).and_then(|mut conn| {
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
            started_at.elapsed().as_millis(),
            error_code(err)
        ),
    }
    opened
}

fn connect(target: &DatabaseTarget) -> DbResult<Connection> {
    let configure = || -> rusqlite::Result<Connection> {
        let conn = match target {
            DatabaseTarget::Memory => Connection::open_in_memory()?,
            DatabaseTarget::File(path) => Connection::open(path)?,
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    };

    configure().map_err(|source| DbError::Open {
        target: target.clone(),
        source,
    })
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Open { .. } => "db_open_failed",
        DbError::Migration { .. } => "db_migration_failed",
        DbError::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        DbError::Sqlite(_) => "db_bootstrap_failed",
    }
}

use cruddemo_core::db::migrations::latest_version;
use cruddemo_core::db::{open_db, open_db_in_memory, open_target, DatabaseTarget, DbError};
use std::error::Error;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "student");
}

#[test]
fn in_memory_databases_are_independent() {
    let first = open_db_in_memory().unwrap();
    first
        .execute(
            "INSERT INTO student (first_name, last_name, email) VALUES ('a', 'b', 'c');",
            [],
        )
        .unwrap();

    let second = open_db_in_memory().unwrap();
    assert_eq!(student_count(&first), 1);
    assert_eq!(student_count(&second), 0);
}

#[test]
fn reopening_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cruddemo.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO student (first_name, last_name, email) VALUES ('a', 'b', 'c');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(student_count(&conn_second), 1);
}

#[test]
fn schema_enforces_not_null_columns() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO student (first_name, last_name, email) VALUES ('a', NULL, 'c');",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreachable_file_reports_open_error_with_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("cruddemo.db");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { target, .. } => {
            assert_eq!(target, &DatabaseTarget::File(path.clone()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.source().is_some());
    assert!(err.to_string().contains("cruddemo.db"));
}

#[test]
fn open_target_memory_matches_open_db_in_memory() {
    let conn = open_target(&DatabaseTarget::Memory).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(student_count(&conn), 0);
}

#[test]
fn target_display_and_mode_describe_the_store() {
    assert_eq!(DatabaseTarget::Memory.to_string(), ":memory:");
    assert_eq!(DatabaseTarget::Memory.mode(), "memory");
    let file = DatabaseTarget::File("/var/lib/cruddemo.db".into());
    assert_eq!(file.to_string(), "/var/lib/cruddemo.db");
    assert_eq!(file.mode(), "file");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn student_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM student;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

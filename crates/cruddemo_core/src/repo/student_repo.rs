//! Student DAO contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose the six student persistence operations as one narrow trait.
//! - Map each operation to a single statement against the connection.
//!
//! # Invariants
//! - Writes run in their own IMMEDIATE transaction, or in a savepoint when the
//!   caller already has one open; either rolls back on drop.
//! - A missing row is `Ok(None)` / an empty `Vec`, never an error, on reads.
//! - No caching: every read goes back to SQLite.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::student::{Student, StudentId};
use log::{error, info};
use rusqlite::{
    params, Connection, OptionalExtension, Params, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email
FROM student";

const STUDENT_COLUMNS: [&str; 4] = ["id", "first_name", "last_name", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store-level failure (connectivity, constraint, SQL), passed through.
    Db(DbError),
    /// `update` targeted an id with no matching row.
    NotFound(StudentId),
    /// `update` was called on a transient student.
    NotPersisted,
    /// Connection was not migrated to the version this DAO expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be mapped to a `Student`.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::NotPersisted => write!(f, "student has no id; save it before updating"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "student repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "student repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "student repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::NotPersisted => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data access contract for `Student` records.
pub trait StudentDao {
    /// Inserts `student` as a new row and writes the generated id back into it.
    fn save(&self, student: &mut Student) -> RepoResult<StudentId>;
    /// Loads one student, or `None` when the id has no row.
    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Loads every student in storage order.
    fn find_all(&self) -> RepoResult<Vec<Student>>;
    /// Loads every student sorted ascending by last name.
    fn find_all_order_by_last_name(&self) -> RepoResult<Vec<Student>>;
    /// Loads students whose last name equals `last_name` exactly.
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Student>>;
    /// Overwrites the stored row for `student.id` with its current fields.
    fn update(&self, student: &Student) -> RepoResult<()>;
}

/// SQLite-backed student DAO.
pub struct SqliteStudentDao<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentDao<'conn> {
    /// Binds the DAO to a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// A `&rusqlite::Transaction` is accepted too; writes then join that
    /// transaction and become visible only when the caller commits it.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_student_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StudentDao for SqliteStudentDao<'_> {
    fn save(&self, student: &mut Student) -> RepoResult<StudentId> {
        match self.insert_student(student) {
            Ok(id) => {
                student.id = Some(id);
                info!("event=student_save module=repo status=ok id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=student_save module=repo status=error error={err}");
                Err(err)
            }
        }
    }

    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_student_row(row)),
            )
            .optional()?
            .transpose()?;
        Ok(student)
    }

    fn find_all(&self) -> RepoResult<Vec<Student>> {
        self.query_students(&format!("{STUDENT_SELECT_SQL};"), [])
    }

    fn find_all_order_by_last_name(&self) -> RepoResult<Vec<Student>> {
        self.query_students(&format!("{STUDENT_SELECT_SQL} ORDER BY last_name ASC;"), [])
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Student>> {
        self.query_students(
            &format!("{STUDENT_SELECT_SQL} WHERE last_name = ?1;"),
            [last_name],
        )
    }

    fn update(&self, student: &Student) -> RepoResult<()> {
        match self.update_student(student) {
            Ok(id) => {
                info!("event=student_update module=repo status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=student_update module=repo status=error id={} error={err}",
                    student.id.map_or_else(|| "none".to_string(), |id| id.to_string())
                );
                Err(err)
            }
        }
    }
}

impl SqliteStudentDao<'_> {
    fn insert_student(&self, student: &Student) -> RepoResult<StudentId> {
        let scope = WriteScope::begin(self.conn)?;
        scope.conn().execute(
            "INSERT INTO student (first_name, last_name, email) VALUES (?1, ?2, ?3);",
            params![
                student.first_name.as_str(),
                student.last_name.as_str(),
                student.email.as_str(),
            ],
        )?;
        let id = scope.conn().last_insert_rowid();
        scope.commit()?;
        Ok(id)
    }

    fn update_student(&self, student: &Student) -> RepoResult<StudentId> {
        let id = student.id.ok_or(RepoError::NotPersisted)?;

        let scope = WriteScope::begin(self.conn)?;
        let changed = scope.conn().execute(
            "UPDATE student
             SET
                first_name = ?1,
                last_name = ?2,
                email = ?3
             WHERE id = ?4;",
            params![
                student.first_name.as_str(),
                student.last_name.as_str(),
                student.email.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        scope.commit()?;
        Ok(id)
    }

    fn query_students<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }
}

/// Unit of work for one DAO write.
///
/// On an autocommit connection this is an IMMEDIATE transaction. Inside a
/// caller's open transaction it is a savepoint, so the write joins the outer
/// transaction and commits or rolls back with it. Dropping an uncommitted
/// scope undoes only this write.
enum WriteScope<'conn> {
    Transaction(Transaction<'conn>),
    Savepoint(WriteSavepoint<'conn>),
}

impl<'conn> WriteScope<'conn> {
    fn begin(conn: &'conn Connection) -> rusqlite::Result<Self> {
        if conn.is_autocommit() {
            Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map(Self::Transaction)
        } else {
            WriteSavepoint::open(conn).map(Self::Savepoint)
        }
    }

    fn conn(&self) -> &Connection {
        match self {
            Self::Transaction(tx) => &**tx,
            Self::Savepoint(savepoint) => savepoint.conn,
        }
    }

    fn commit(self) -> rusqlite::Result<()> {
        match self {
            Self::Transaction(tx) => tx.commit(),
            Self::Savepoint(savepoint) => savepoint.release(),
        }
    }
}

struct WriteSavepoint<'conn> {
    conn: &'conn Connection,
    released: bool,
}

impl<'conn> WriteSavepoint<'conn> {
    fn open(conn: &'conn Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("SAVEPOINT student_write;")?;
        Ok(Self {
            conn,
            released: false,
        })
    }

    fn release(mut self) -> rusqlite::Result<()> {
        self.conn.execute_batch("RELEASE student_write;")?;
        self.released = true;
        Ok(())
    }
}

impl Drop for WriteSavepoint<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self
            .conn
            .execute_batch("ROLLBACK TO student_write; RELEASE student_write;")
        {
            error!("event=student_write_rollback module=repo status=error error={err}");
        }
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in student.id"
        )));
    }

    Ok(Student {
        id: Some(id),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}

fn ensure_student_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "student")? {
        return Err(RepoError::MissingRequiredTable("student"));
    }

    for column in STUDENT_COLUMNS {
        if !table_has_column(conn, "student", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "student",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

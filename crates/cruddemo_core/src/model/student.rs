//! Student entity model.
//!
//! # Responsibility
//! - Define the single persisted record managed by the repository facade.
//! - Track the transient/persistent lifecycle through the optional id.
//!
//! # Invariants
//! - `id` is `None` until the first successful save.
//! - Once assigned, `id` is owned by the storage layer and never reused.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Surrogate key assigned by SQLite on insert.
pub type StudentId = i64;

/// Student record mapped one-to-one to a `student` table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Generated on first save; `None` while transient.
    pub id: Option<StudentId>,
    pub first_name: String,
    /// Sort key for ordered listings.
    pub last_name: String,
    /// Not unique; uniqueness would be a schema concern.
    pub email: String,
}

impl Student {
    /// Creates a transient student with no id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Returns whether storage has assigned an id to this student.
    pub fn is_persistent(&self) -> bool {
        self.id.is_some()
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Student{{id={id}")?,
            None => write!(f, "Student{{id=null")?,
        }
        write!(
            f,
            ", firstName='{}', lastName='{}', email='{}'}}",
            self.first_name, self.last_name, self.email
        )
    }
}

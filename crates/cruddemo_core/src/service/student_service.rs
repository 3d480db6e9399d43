//! Student use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for driver code.
//! - Delegate persistence to a `StudentDao` implementation.
//!
//! # Invariants
//! - Service APIs never bypass the DAO.
//! - Service layer remains storage-agnostic.

use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::{RepoResult, StudentDao};

/// Use-case wrapper over a student DAO.
pub struct StudentService<R: StudentDao> {
    repo: R,
}

impl<R: StudentDao> StudentService<R> {
    /// Creates a service using the provided DAO implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds a transient student, saves it and returns the persisted copy.
    pub fn create_student(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<Student> {
        let mut student = Student::new(first_name, last_name, email);
        self.repo.save(&mut student)?;
        Ok(student)
    }

    pub fn save(&self, student: &mut Student) -> RepoResult<StudentId> {
        self.repo.save(student)
    }

    pub fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.find_by_id(id)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Student>> {
        self.repo.find_all()
    }

    pub fn find_all_order_by_last_name(&self) -> RepoResult<Vec<Student>> {
        self.repo.find_all_order_by_last_name()
    }

    pub fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Student>> {
        self.repo.find_by_last_name(last_name)
    }

    /// Returns DAO-level not-found errors unchanged.
    pub fn update(&self, student: &Student) -> RepoResult<()> {
        self.repo.update(student)
    }
}

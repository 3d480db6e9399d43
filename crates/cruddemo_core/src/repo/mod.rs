//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for students.
//! - Keep SQL details out of service and driver code.
//!
//! # Invariants
//! - Store errors propagate unchanged inside `RepoError::Db`.
//! - Absence on reads is a normal result, not an error.

pub mod student_repo;

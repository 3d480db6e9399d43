//! Domain model for the student CRUD demo.
//!
//! # Responsibility
//! - Define the data structures persisted by the repository layer.
//!
//! # Invariants
//! - Identity is assigned by storage, never by callers.

pub mod student;

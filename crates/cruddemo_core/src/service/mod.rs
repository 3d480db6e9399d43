//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate DAO calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod student_service;

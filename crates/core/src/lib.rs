//! Domain logic for the student registry.
//!
//! This crate is pure: no database access, no HTTP. It holds the error
//! taxonomy, field validation rules, input sanitization, student-ID
//! formatting, and pagination math shared by the `registry-db` and
//! `registry-api` crates.

pub mod error;
pub mod pagination;
pub mod sanitize;
pub mod student_id;
pub mod types;
pub mod validation;

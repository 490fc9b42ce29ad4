//! Business-rule orchestration between validation and persistence.

pub mod students;

pub use students::StudentService;

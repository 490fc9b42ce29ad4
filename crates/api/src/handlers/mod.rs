//! Axum handler functions, grouped per resource.

pub mod audit;
pub mod auth;
pub mod settings;
pub mod students;

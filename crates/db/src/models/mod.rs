//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches where applicable

pub mod audit;
pub mod session;
pub mod setting;
pub mod student;
pub mod user;

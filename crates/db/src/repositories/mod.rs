//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod session_repo;
pub mod setting_repo;
pub mod student_repo;
pub mod user_repo;

pub use audit_repo::AuditRepo;
pub use session_repo::SessionRepo;
pub use setting_repo::SettingRepo;
pub use student_repo::StudentRepo;
pub use user_repo::UserRepo;

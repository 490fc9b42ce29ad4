//! Admin user entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use registry_core::types::{DbId, Timestamp};

/// A row from the `admin_users` table.
///
/// The password hash is an argon2id PHC string and is never serialized
/// into API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new admin user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Defaults to `admin` if omitted.
    pub role: Option<String>,
}

//! Audit log entry model and insert DTO.

use serde::Serialize;
use sqlx::FromRow;

use registry_core::types::{DbId, Timestamp};

/// A row from the `audit_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    /// Null for anonymous actions (e.g. public registration).
    pub user_id: Option<DbId>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<DbId>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Insert DTO for a new audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Option<DbId>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<DbId>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

//! System setting model.

use serde::Serialize;
use sqlx::FromRow;

use registry_core::types::{DbId, Timestamp};

/// A row from the `system_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub id: DbId,
    pub setting_key: String,
    pub setting_value: String,
    pub description: Option<String>,
    pub updated_at: Timestamp,
}

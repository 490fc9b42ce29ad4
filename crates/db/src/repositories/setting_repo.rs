//! Repository for the `system_settings` table.

use sqlx::PgPool;

use crate::models::setting::Setting;

const COLUMNS: &str = "id, setting_key, setting_value, description, updated_at";

/// Provides key/value access to system settings. Settings are always
/// persisted rows, never process-memory state.
pub struct SettingRepo;

impl SettingRepo {
    /// List all settings ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings ORDER BY setting_key");
        sqlx::query_as::<_, Setting>(&query).fetch_all(pool).await
    }

    /// Fetch a single setting by key.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE setting_key = $1");
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a setting value.
    pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_settings (setting_key, setting_value)
             VALUES ($1, $2)
             ON CONFLICT (setting_key) DO UPDATE
             SET setting_value = EXCLUDED.setting_value, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}

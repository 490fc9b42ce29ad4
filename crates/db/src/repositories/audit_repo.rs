//! Repository for the `audit_log` table.

use sqlx::PgPool;

use crate::models::audit::{AuditEntry, NewAuditEntry};

const COLUMNS: &str =
    "id, user_id, action, table_name, record_id, old_values, new_values, created_at";

/// Append-only audit trail of data mutations.
pub struct AuditRepo;

impl AuditRepo {
    /// Append one audit entry.
    pub async fn record(pool: &PgPool, entry: &NewAuditEntry) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log (user_id, action, table_name, record_id, old_values, new_values)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.table_name)
            .bind(entry.record_id)
            .bind(&entry.old_values)
            .bind(&entry.new_values)
            .fetch_one(pool)
            .await
    }

    /// List entries newest first. `limit` is capped at 500.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let limit = limit.unwrap_or(50).clamp(1, 500);
        let offset = offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

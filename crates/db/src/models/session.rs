//! Refresh-token session model.

use sqlx::FromRow;

use registry_core::types::{DbId, Timestamp};

/// A row from the `sessions` table. `token_hash` is the SHA-256 hash of
/// the opaque refresh token handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

//! Handlers for the `/settings` resource.
//!
//! Settings are persisted rows in `system_settings`; nothing is cached in
//! process memory, so an update is visible to every instance immediately.
//! Updates are restricted to a fixed key allow-list and the admin role.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use registry_db::models::audit::NewAuditEntry;
use registry_db::models::setting::Setting;
use registry_db::repositories::{AuditRepo, SettingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Keys a client may update. Anything else is rejected outright so the
/// table cannot be used as arbitrary key/value storage.
const ALLOWED_KEYS: &[&str] = &[
    "school_name",
    "academic_year",
    "student_id_prefix",
    "default_semester",
    "registration_enabled",
];

/// Request body for `PUT /settings/{key}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

/// GET /api/v1/settings
pub async fn list_settings(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Setting>>>> {
    let settings = SettingRepo::list(&state.pool).await?;

    Ok(Json(ApiResponse::new(
        "Settings retrieved successfully",
        settings,
    )))
}

/// PUT /api/v1/settings/{key}
///
/// Update one allow-listed setting. Admin only.
pub async fn update_setting(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpdateSettingRequest>,
) -> AppResult<Json<ApiResponse<Setting>>> {
    auth.require_admin()?;

    if !ALLOWED_KEYS.contains(&key.as_str()) {
        return Err(AppError::BadRequest(format!("Unknown setting key: {key}")));
    }

    let previous = SettingRepo::get(&state.pool, &key).await?;
    let setting = SettingRepo::upsert(&state.pool, &key, &input.value).await?;

    tracing::info!(key = %key, user_id = auth.user_id, "Setting updated");

    let entry = NewAuditEntry {
        user_id: Some(auth.user_id),
        action: "UPDATE".to_string(),
        table_name: "system_settings".to_string(),
        record_id: Some(setting.id),
        old_values: previous.and_then(|p| serde_json::to_value(&p).ok()),
        new_values: serde_json::to_value(&setting).ok(),
    };
    if let Err(err) = AuditRepo::record(&state.pool, &entry).await {
        tracing::warn!(error = %err, key = %key, "failed to record audit entry");
    }

    Ok(Json(ApiResponse::new("Setting updated successfully", setting)))
}

//! Handlers for the audit-trail admin endpoint.

use axum::extract::{Query, State};
use axum::Json;

use registry_db::models::audit::AuditEntry;
use registry_db::repositories::AuditRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/admin/audit
///
/// List audit entries newest first. Admin only.
pub async fn list_audit(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<AuditEntry>>>> {
    auth.require_admin()?;

    let entries = AuditRepo::list(&state.pool, params.limit, params.offset).await?;

    Ok(Json(ApiResponse::new(
        "Audit entries retrieved successfully",
        entries,
    )))
}

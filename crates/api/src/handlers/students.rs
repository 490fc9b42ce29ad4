//! Handlers for the `/students` resource.
//!
//! Registration is public; updates and deletes require authentication via
//! [`AuthUser`]. All responses use the standard success envelope; errors
//! flow through [`AppError`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use registry_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteParams, StudentListParams};
use crate::response::ApiResponse;
use crate::service::students::{RegisterStudentInput, UpdateStudentInput};
use crate::service::StudentService;
use crate::state::AppState;

/// Request body for `DELETE /students?bulk=1`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<DbId>,
}

/// GET /api/v1/students
///
/// Filtered, paginated listing. With `?stats=1` the endpoint returns the
/// aggregate statistics report instead of a page of students.
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentListParams>,
) -> AppResult<impl IntoResponse> {
    if params.stats == Some(1) {
        let stats = StudentService::stats(&state.pool).await?;
        return Ok(Json(ApiResponse::new("Statistics retrieved successfully", stats))
            .into_response());
    }

    let page = StudentService::search(&state.pool, &params).await?;

    Ok(Json(ApiResponse::new("Students retrieved successfully", page)).into_response())
}

/// GET /api/v1/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let student = StudentService::get(&state.pool, id).await?;

    Ok(Json(ApiResponse::new("Student retrieved successfully", student)))
}

/// POST /api/v1/students
///
/// Public registration endpoint. Returns 201 with the created row, or 400
/// carrying the full set of field errors.
pub async fn register_student(
    State(state): State<AppState>,
    Json(input): Json<RegisterStudentInput>,
) -> AppResult<impl IntoResponse> {
    let student = StudentService::register(&state.pool, None, input).await?;

    tracing::info!(
        student_id = %student.student_id,
        id = student.id,
        "Student registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Student registered successfully", student)),
    ))
}

/// PUT /api/v1/students/{id}
pub async fn update_student(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudentInput>,
) -> AppResult<impl IntoResponse> {
    let student =
        StudentService::update(&state.pool, Some(auth.user_id), id, input).await?;

    tracing::info!(id, user_id = auth.user_id, "Student updated");

    Ok(Json(ApiResponse::new("Student updated successfully", student)))
}

/// DELETE /api/v1/students/{id}
pub async fn delete_student(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    StudentService::delete(&state.pool, Some(auth.user_id), id).await?;

    tracing::info!(id, user_id = auth.user_id, "Student deleted");

    Ok(Json(ApiResponse::message_only("Student deleted successfully")))
}

/// DELETE /api/v1/students?bulk=1
///
/// Soft-deletes every id in the body. Without the `bulk=1` flag the
/// collection DELETE is rejected; single deletes go through
/// `DELETE /students/{id}`.
pub async fn bulk_delete_students(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BulkDeleteParams>,
    Json(body): Json<BulkDeleteBody>,
) -> AppResult<impl IntoResponse> {
    if params.bulk != Some(1) {
        return Err(AppError::BadRequest(
            "Student ID required for deletion".into(),
        ));
    }

    let affected = StudentService::bulk_delete(&state.pool, Some(auth.user_id), &body.ids).await?;

    tracing::info!(
        requested = body.ids.len(),
        affected,
        user_id = auth.user_id,
        "Bulk student delete"
    );

    Ok(Json(ApiResponse::new(
        format!("{affected} student(s) deleted successfully"),
        serde_json::json!({ "deleted": affected }),
    )))
}

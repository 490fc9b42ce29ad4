//! Route definitions for the `/students` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::students;
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// ```text
/// GET    /          -> list_students (?stats=1 for the statistics report)
/// POST   /          -> register_student (public)
/// DELETE /          -> bulk_delete_students (?bulk=1, requires auth)
/// GET    /{id}      -> get_student
/// PUT    /{id}      -> update_student (requires auth)
/// DELETE /{id}      -> delete_student (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(students::list_students)
                .post(students::register_student)
                .delete(students::bulk_delete_students),
        )
        .route(
            "/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
}

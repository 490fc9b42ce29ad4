pub mod auth;
pub mod health;
pub mod settings;
pub mod students;

use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /students                list, register (public), bulk delete (?bulk=1)
/// /students/{id}           get, update, delete
///
/// /auth/login              login (public)
/// /auth/refresh            refresh (public)
/// /auth/logout             logout (requires auth)
/// /auth/me                 current user (requires auth)
///
/// /settings                list (requires auth)
/// /settings/{key}          update (admin only)
///
/// /admin/audit             audit trail listing (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/students", students::router())
        .nest("/auth", auth::router())
        .nest("/settings", settings::router())
        .route(
            "/admin/audit",
            axum::routing::get(handlers::audit::list_audit),
        )
}

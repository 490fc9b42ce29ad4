//! Route definitions for the `/settings` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET /          -> list_settings (requires auth)
/// PUT /{key}     -> update_setting (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::list_settings))
        .route("/{key}", put(settings::update_setting))
}

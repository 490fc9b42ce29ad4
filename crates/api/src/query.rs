//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /students`.
///
/// `page` and `limit` are clamped in `registry_core::pagination`; filter
/// strings are sanitized by the service before reaching the repository.
/// `stats=1` switches the endpoint to the aggregate statistics report.
#[derive(Debug, Default, Deserialize)]
pub struct StudentListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub course: Option<String>,
    /// Academic year filter (query key `year`).
    pub year: Option<String>,
    pub gender: Option<String>,
    pub semester: Option<String>,
    pub status: Option<String>,
    pub stats: Option<u8>,
}

/// Query parameters for `DELETE /students` (`?bulk=1`).
#[derive(Debug, Default, Deserialize)]
pub struct BulkDeleteParams {
    pub bulk: Option<u8>,
}

/// Generic pagination parameters (`?limit=&offset=`) for admin listings.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

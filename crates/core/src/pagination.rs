//! Pagination clamping and response metadata.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Maximum page size a client may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size to [1, 100], defaulting to 10.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE)
}

/// Row offset for a clamped page/per_page pair.
pub fn offset(page: i64, per_page: i64) -> i64 {
    (page - 1) * per_page
}

/// Pagination block returned alongside every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Build metadata for a page of a result set with `total_records` rows.
    pub fn new(current_page: i64, per_page: i64, total_records: i64) -> Self {
        let total_pages = if total_records == 0 {
            0
        } else {
            (total_records + per_page - 1) / per_page
        };
        Self {
            current_page,
            total_pages,
            total_records,
            per_page,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}

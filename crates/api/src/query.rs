//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped via `quill_core::search::clamp_limit` /
/// `clamp_offset` before they reach the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the revision listing endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// `newest` (default) or `oldest`.
    pub order: Option<String>,
}

/// Query parameters for the version comparison endpoint.
///
/// A missing or non-positive id means "the live post".
#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub left: Option<i64>,
    pub right: Option<i64>,
}

/// Query parameters for list endpoints filtered by a state/status string.
#[derive(Debug, Deserialize)]
pub struct StateFilterParams {
    pub state: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for post listing.
#[derive(Debug, Deserialize)]
pub struct PostListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for full-text search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

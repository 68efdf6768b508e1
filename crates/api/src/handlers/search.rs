//! Full-text search over the maintained index.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use quill_core::error::CoreError;
use quill_core::search::{build_tsquery, clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use quill_db::repositories::SearchIndexRepo;

use crate::error::AppResult;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search?q=
///
/// Ranked query against the search index. Only published, indexable posts
/// ever have index rows, so no status filtering is needed here.
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let tsquery = build_tsquery(&params.q)
        .ok_or_else(|| CoreError::Validation("Search query must not be empty".into()))?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let hits = SearchIndexRepo::search(&state.pool, &tsquery, limit, offset).await?;
    Ok(Json(DataResponse { data: hits }))
}

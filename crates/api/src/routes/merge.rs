//! Route definitions for the collaborative merge workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::merge;
use crate::state::AppState;

/// Merge routes, merged into `/api/v1`.
///
/// ```text
/// POST   /posts/{id}/merge                 push_merge (intake)
/// GET    /posts/{id}/merge/{mid}           get_merge_request
/// GET    /merge-requests                   list_merge_requests
/// GET    /merge-requests/{mid}/compare     compare_merge_request
/// POST   /merge-requests/{mid}/accept      accept_merge_request
/// POST   /merge-requests/{mid}/block       block_merge_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/merge", post(merge::push_merge))
        .route("/posts/{id}/merge/{mid}", get(merge::get_merge_request))
        .route("/merge-requests", get(merge::list_merge_requests))
        .route(
            "/merge-requests/{mid}/compare",
            get(merge::compare_merge_request),
        )
        .route(
            "/merge-requests/{mid}/accept",
            post(merge::accept_merge_request),
        )
        .route(
            "/merge-requests/{mid}/block",
            post(merge::block_merge_request),
        )
}

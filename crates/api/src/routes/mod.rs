pub mod admin;
pub mod health;
pub mod merge;
pub mod posts;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /posts                                   write (POST), list (GET)
/// /posts/submit                            anonymous submission (POST)
/// /posts/{id}                              get, hard delete
/// /posts/{id}/...                          edit, moderation, history, merge
/// /merge-requests                          moderation queue
/// /merge-requests/{mid}/...                compare, accept, block
/// /verification-code                       issue one-time code (POST)
/// /search                                  full-text query (GET)
/// /messages/...                            moderator inbox
/// /admin/...                               taxonomy + keyword set
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .merge(merge::router())
        .nest("/admin", admin::router())
        .route("/verification-code", post(handlers::token::issue_code))
        .route("/search", get(handlers::search::search_posts))
        .route(
            "/messages/unread",
            get(handlers::moderation::list_unread_messages),
        )
        .route(
            "/messages/{id}/read",
            post(handlers::moderation::mark_message_read),
        )
}

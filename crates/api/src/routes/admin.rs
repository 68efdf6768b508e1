//! Route definitions for taxonomy and keyword administration.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes, nested under `/api/v1/admin`.
///
/// ```text
/// GET    /categories             list_categories
/// POST   /categories             create_category
/// GET    /topics                 list_topics
/// POST   /topics                 create_topic
/// GET    /banned-keywords        list_banned_keywords
/// POST   /banned-keywords        create_banned_keyword
/// DELETE /banned-keywords/{id}   delete_banned_keyword
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(admin::list_categories).post(admin::create_category),
        )
        .route("/topics", get(admin::list_topics).post(admin::create_topic))
        .route(
            "/banned-keywords",
            get(admin::list_banned_keywords).post(admin::create_banned_keyword),
        )
        .route(
            "/banned-keywords/{id}",
            delete(admin::delete_banned_keyword),
        )
}

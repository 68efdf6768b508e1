//! Route definitions for authoring, submission, editing, moderation, and
//! revision history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{history, moderation, posts};
use crate::state::AppState;

/// Post routes, merged into `/api/v1`.
///
/// ```text
/// POST   /posts                                write_post
/// GET    /posts                                list_posts
/// POST   /posts/submit                         submit_post
/// GET    /posts/{id}                           get_post
/// DELETE /posts/{id}                           delete_post
/// POST   /posts/{id}/edit                      edit_post
/// POST   /posts/{id}/pass                      pass_post
/// POST   /posts/{id}/takedown                  takedown_post
/// POST   /posts/{id}/takeup                    takeup_post
/// POST   /posts/{id}/block                     block_post
/// POST   /posts/{id}/locked-switch             toggle_locked
/// POST   /posts/{id}/disable-comment           toggle_disable_comment
/// POST   /posts/{id}/disable-copy              toggle_disable_copy
/// POST   /posts/{id}/change-category/{cid}     change_category
/// POST   /posts/{id}/change-topics             change_topics
/// GET    /posts/{id}/history                   list_history
/// GET    /posts/{id}/history/compare           compare_versions
/// GET    /posts/{id}/history/{hid}             get_revision
/// DELETE /posts/{id}/history/{hid}             delete_revision
/// POST   /posts/{id}/history/{hid}/revert      revert_to_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(posts::write_post).get(posts::list_posts))
        .route("/posts/submit", post(posts::submit_post))
        .route(
            "/posts/{id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/posts/{id}/edit", post(posts::edit_post))
        .route("/posts/{id}/pass", post(moderation::pass_post))
        .route("/posts/{id}/takedown", post(moderation::takedown_post))
        .route("/posts/{id}/takeup", post(moderation::takeup_post))
        .route("/posts/{id}/block", post(moderation::block_post))
        .route("/posts/{id}/locked-switch", post(moderation::toggle_locked))
        .route(
            "/posts/{id}/disable-comment",
            post(moderation::toggle_disable_comment),
        )
        .route(
            "/posts/{id}/disable-copy",
            post(moderation::toggle_disable_copy),
        )
        .route(
            "/posts/{id}/change-category/{cid}",
            post(moderation::change_category),
        )
        .route("/posts/{id}/change-topics", post(moderation::change_topics))
        .route("/posts/{id}/history", get(history::list_history))
        .route(
            "/posts/{id}/history/compare",
            get(history::compare_versions),
        )
        .route(
            "/posts/{id}/history/{hid}",
            get(history::get_revision).delete(history::delete_revision),
        )
        .route(
            "/posts/{id}/history/{hid}/revert",
            post(history::revert_to_revision),
        )
}

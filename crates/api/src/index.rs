//! Index synchronizer: keeps the full-text search index aligned with the
//! post lifecycle.
//!
//! Callers invoke these functions only after the transactional write to the
//! post has committed. The index itself is a best-effort external
//! collaborator: failures are logged and swallowed, never surfaced to the
//! request that triggered them.

use quill_core::htmldiff::strip_tags;
use quill_core::moderation::LIMIT_SEARCH_ENGINE_ONLY;
use quill_core::types::DbId;
use quill_db::models::post::Post;
use quill_db::repositories::SearchIndexRepo;
use quill_db::DbPool;

/// Index a post that entered (or changed while in) the published state.
///
/// Search-engine-only posts are excluded from the internal index; calling
/// this for one removes any stale row instead.
pub async fn sync_add(pool: &DbPool, post: &Post) {
    if post.limit_mode == LIMIT_SEARCH_ENGINE_ONLY {
        sync_delete(pool, post.id).await;
        return;
    }

    let body = strip_tags(&post.content);
    match SearchIndexRepo::add(pool, post.id, &post.title, &body).await {
        Ok(_) => tracing::debug!(post_id = post.id, "Search index updated"),
        Err(e) => tracing::error!(post_id = post.id, error = %e, "Search index add failed"),
    }
}

/// Drop a post that left the published state from the index.
pub async fn sync_delete(pool: &DbPool, post_id: DbId) {
    match SearchIndexRepo::delete(pool, post_id).await {
        Ok(removed) => {
            if removed {
                tracing::debug!(post_id, "Search index row removed");
            }
        }
        Err(e) => tracing::error!(post_id, error = %e, "Search index delete failed"),
    }
}

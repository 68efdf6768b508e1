//! Moderator actions on posts: review decisions, lifecycle transitions,
//! flag toggles, and the inbox.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use quill_core::error::CoreError;
use quill_core::moderation::PostStatus;
use quill_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use quill_core::types::DbId;
use quill_db::repositories::{MessageRepo, PostRepo};
use quill_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::index;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Review decisions
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/pass
///
/// Approve a pending submission: publish it now and index it.
pub async fn pass_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = PostRepo::publish_now(&state.pool, id, Utc::now())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    index::sync_add(&state.pool, &post).await;
    state
        .notifier
        .publish(DomainEvent::new("post.published").with_post(post.id));

    tracing::info!(post_id = post.id, "Submission approved and published");
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/v1/posts/{id}/takedown
///
/// Pull a post from publication and drop it from the index.
pub async fn takedown_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PostRepo::set_status(&state.pool, id, PostStatus::Takedown.as_str()).await? {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }

    index::sync_delete(&state.pool, id).await;
    state
        .notifier
        .publish(DomainEvent::new("post.takedown").with_post(id));

    tracing::info!(post_id = id, "Post taken down");
    Ok(Json(DataResponse { data: json!({ "status": PostStatus::Takedown.as_str() }) }))
}

/// POST /api/v1/posts/{id}/takeup
///
/// Restore a taken-down post to publication and re-index it.
pub async fn takeup_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PostRepo::set_status(&state.pool, id, PostStatus::Published.as_str()).await? {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    index::sync_add(&state.pool, &post).await;
    state
        .notifier
        .publish(DomainEvent::new("post.published").with_post(id));

    tracing::info!(post_id = id, "Post restored to publication");
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/v1/posts/{id}/block
///
/// Mark a post as forbidden (abusive). The author's email joins the
/// submission blacklist via the derived trust record, and the post leaves
/// the index.
pub async fn block_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PostRepo::set_status(&state.pool, id, PostStatus::Forbidden.as_str()).await? {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }

    index::sync_delete(&state.pool, id).await;
    state
        .notifier
        .publish(DomainEvent::new("post.forbidden").with_post(id));

    tracing::info!(post_id = id, "Post marked forbidden");
    Ok(Json(DataResponse { data: json!({ "status": PostStatus::Forbidden.as_str() }) }))
}

// ---------------------------------------------------------------------------
// Flag toggles
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/locked-switch
pub async fn toggle_locked(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let locked = PostRepo::toggle_locked(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    tracing::info!(post_id = id, locked, "Edit lock toggled");
    Ok(Json(DataResponse { data: json!({ "locked": locked }) }))
}

/// POST /api/v1/posts/{id}/disable-comment
pub async fn toggle_disable_comment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let disabled = PostRepo::toggle_disable_comment(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    tracing::info!(post_id = id, disabled, "Comment switch toggled");
    Ok(Json(DataResponse { data: json!({ "disable_comment": disabled }) }))
}

/// POST /api/v1/posts/{id}/disable-copy
pub async fn toggle_disable_copy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let disabled = PostRepo::toggle_disable_copy(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    tracing::info!(post_id = id, disabled, "Copy protection toggled");
    Ok(Json(DataResponse { data: json!({ "disable_copy": disabled }) }))
}

// ---------------------------------------------------------------------------
// Classification changes
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/change-category/{cid}
pub async fn change_category(
    State(state): State<AppState>,
    Path((id, cid)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !quill_db::repositories::CategoryRepo::exists_available(&state.pool, cid).await? {
        return Err(CoreError::Validation("Please choose a category".into()).into());
    }
    if !PostRepo::change_category(&state.pool, id, cid).await? {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }
    Ok(Json(DataResponse { data: json!({ "category_id": cid }) }))
}

/// Request body for replacing a post's topic memberships.
#[derive(Debug, Deserialize)]
pub struct ChangeTopicsRequest {
    #[serde(default)]
    pub topic_ids: Vec<DbId>,
}

/// POST /api/v1/posts/{id}/change-topics
pub async fn change_topics(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeTopicsRequest>,
) -> AppResult<impl IntoResponse> {
    if !quill_db::repositories::TopicRepo::all_exist(&state.pool, &input.topic_ids).await? {
        return Err(CoreError::Validation("One or more topics do not exist".into()).into());
    }
    if !PostRepo::set_topics(&state.pool, id, &input.topic_ids).await? {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }
    Ok(Json(DataResponse { data: json!({ "topic_ids": input.topic_ids }) }))
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

/// GET /api/v1/messages/unread
pub async fn list_unread_messages(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let messages = MessageRepo::list_unread(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/messages/{id}/read
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MessageRepo::mark_read(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Message", id }.into());
    }
    Ok(Json(DataResponse { data: json!({ "read": true }) }))
}

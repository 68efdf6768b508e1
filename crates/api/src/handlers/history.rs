//! Handlers for the revision store: listing, inspection, comparison,
//! deletion, and revert.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use quill_core::error::CoreError;
use quill_core::htmldiff::html_diff;
use quill_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use quill_core::types::{DbId, Timestamp};
use quill_db::models::post::PostContentUpdate;
use quill_db::repositories::{PostRepo, RevisionRepo};
use quill_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::index;
use crate::lock;
use crate::query::{CompareParams, HistoryListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/posts/{id}/history
///
/// List a post's revisions. `order=oldest` flips the default
/// newest-first ordering.
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<HistoryListParams>,
) -> AppResult<impl IntoResponse> {
    PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    let newest_first = params.order.as_deref() != Some("oldest");
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let revisions =
        RevisionRepo::list_by_post(&state.pool, id, newest_first, limit, offset).await?;
    let total = RevisionRepo::count_by_post(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: json!({ "revisions": revisions, "total": total }),
    }))
}

/// GET /api/v1/posts/{id}/history/{hid}
pub async fn get_revision(
    State(state): State<AppState>,
    Path((id, hid)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let revision = RevisionRepo::find_by_id(&state.pool, hid)
        .await?
        .filter(|r| r.post_id == id)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Revision", id: hid }))?;
    Ok(Json(DataResponse { data: revision }))
}

/// One side of a version comparison.
struct CompareSide {
    title: String,
    content: String,
    modify_date: Timestamp,
}

/// Resolve a comparison side: a revision id, or the live post for a missing
/// or non-positive id.
async fn resolve_side(
    state: &AppState,
    post_id: DbId,
    revision_id: Option<DbId>,
) -> AppResult<CompareSide> {
    match revision_id.filter(|rid| *rid > 0) {
        Some(rid) => {
            let revision = RevisionRepo::find_by_id(&state.pool, rid)
                .await?
                .filter(|r| r.post_id == post_id)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Revision",
                    id: rid,
                }))?;
            Ok(CompareSide {
                title: revision.title,
                content: revision.content,
                modify_date: revision.modify_date,
            })
        }
        None => {
            let post = PostRepo::find_by_id(&state.pool, post_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Post",
                    id: post_id,
                }))?;
            Ok(CompareSide {
                title: post.title,
                content: post.content,
                modify_date: post.modify_date,
            })
        }
    }
}

/// GET /api/v1/posts/{id}/history/compare?left=&right=
///
/// Side-by-side comparison of two versions with inserted/deleted spans
/// marked. Either side may be the live post (id omitted or `0`).
pub async fn compare_versions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let left = resolve_side(&state, id, params.left).await?;
    let right = resolve_side(&state, id, params.right).await?;

    let (left_annotated, right_annotated) = html_diff(&left.content, &right.content);
    Ok(Json(DataResponse {
        data: json!({
            "left": {
                "title": left.title,
                "content": left_annotated,
                "modify_date": left.modify_date,
            },
            "right": {
                "title": right.title,
                "content": right_annotated,
                "modify_date": right.modify_date,
            },
        }),
    }))
}

/// DELETE /api/v1/posts/{id}/history/{hid}
///
/// Operator deletion of a single revision.
pub async fn delete_revision(
    State(state): State<AppState>,
    Path((id, hid)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    RevisionRepo::find_by_id(&state.pool, hid)
        .await?
        .filter(|r| r.post_id == id)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Revision", id: hid }))?;

    RevisionRepo::delete(&state.pool, hid).await?;
    tracing::info!(post_id = id, revision_id = hid, "Revision deleted");
    Ok(Json(DataResponse { data: json!({ "deleted": true }) }))
}

/// POST /api/v1/posts/{id}/history/{hid}/revert
///
/// Copy the revision's archived state back onto the live post and delete
/// the consumed revision. The pre-revert state is not re-archived, so a
/// revert is not itself undoable.
pub async fn revert_to_revision(
    State(state): State<AppState>,
    Path((id, hid)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    lock::acquire(&mut tx, lock::ROUTE_REVERT, id).await?;

    let revision = RevisionRepo::find_by_id(&mut *tx, hid)
        .await?
        .filter(|r| r.post_id == id)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Revision", id: hid }))?;

    let update = PostContentUpdate {
        title: revision.title.clone(),
        content: revision.content.clone(),
        protect_content: revision.protect_content.clone(),
        category_id: revision.category_id,
        label: revision.label.clone(),
        topic_ids: revision.topic_ids.clone(),
        modifier: None,
        modifier_email: None,
        modify_date: revision.modify_date,
    };
    let restored = PostRepo::apply_content(&mut *tx, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    RevisionRepo::delete(&mut *tx, hid).await?;
    tx.commit().await?;

    if restored.status == "published" {
        index::sync_add(&state.pool, &restored).await;
    }

    state.notifier.publish(
        DomainEvent::new("post.reverted")
            .with_post(restored.id)
            .with_payload(json!({ "revision_id": hid })),
    );

    tracing::info!(post_id = restored.id, revision_id = hid, "Post reverted to revision");
    Ok(Json(DataResponse { data: restored }))
}

//! Handlers for the collaborative merge workflow.
//!
//! Third parties propose replacement content for a published post; the
//! original author's proposals apply immediately, everyone else's enter the
//! moderation queue as merge requests. Moderators accept (apply + archive)
//! or block (blacklist the submitter).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use validator::ValidateEmail;

use quill_core::error::CoreError;
use quill_core::htmldiff::{diff_merge, html_diff};
use quill_core::merge::{can_accept, can_block, MergeState};
use quill_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use quill_core::similarity;
use quill_core::types::DbId;
use quill_db::models::merge_request::{CreateMergeRequest, MergeRequest, PushMergeRequest};
use quill_db::models::message::CreateMessage;
use quill_db::models::post::PostContentUpdate;
use quill_db::models::revision::CreateRevision;
use quill_db::repositories::{CodeRepo, MergeRequestRepo, MessageRepo, PostRepo, RevisionRepo};
use quill_events::{DomainEvent, Notification};

use crate::error::{AppError, AppResult};
use crate::index;
use crate::lock;
use crate::query::StateFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

use super::posts::archive_and_apply;

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/merge
///
/// Merge intake. Runs the full gate: verification code, target lookup,
/// no-op detection, global blacklist, duplicate-pending. The original
/// author's edit applies directly (fast path); anyone else's creates or
/// overwrites a pending merge request and notifies the moderators with a
/// rendered diff.
pub async fn push_merge(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<PushMergeRequest>,
) -> AppResult<impl IntoResponse> {
    if !input.modifier_email.validate_email() {
        return Err(CoreError::Validation("A valid email address is required".into()).into());
    }

    // 1. One-time code: matched and consumed in a single atomic statement.
    if !CodeRepo::consume(&state.pool, &input.modifier_email, &input.code).await? {
        return Err(CoreError::InvalidCode.into());
    }

    // 2. The target must be published and open for edits.
    let post = PostRepo::find_editable(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    // 3. No-op detection: protect the queue from meaningless proposals.
    if similarity::is_noop_change(&post.title, &input.title, &post.content, &input.content) {
        return Err(CoreError::NoOpChange.into());
    }

    // 4. Global blacklist: one blocked request anywhere denies everywhere.
    if MergeRequestRepo::has_blocked_submitter(&state.pool, &input.modifier_email).await? {
        return Err(CoreError::Blacklisted(
            "This email has been blacklisted for repeated abusive edit requests and can \
             no longer propose changes"
                .into(),
        )
        .into());
    }

    let ip = super::client_ip(&headers);

    // Fast path: the original author needs no review.
    if post.email == input.modifier_email {
        return self_merge(&state, post.id, &input).await;
    }

    // 5. One open request per (post, submitter). A blind second submission
    // is rejected; an explicit resubmission (carrying its request id)
    // overwrites the existing row below instead.
    if input.merge_request_id.is_none()
        && MergeRequestRepo::has_pending(&state.pool, post.id, &input.modifier_email).await?
    {
        return Err(CoreError::DuplicatePending.into());
    }

    // Slow path: create or overwrite the submitter's request.
    let create = CreateMergeRequest {
        post_id: post.id,
        title: input.title.clone(),
        content: input.content.clone(),
        modifier: input.modifier.clone(),
        modifier_email: input.modifier_email.clone(),
        ip: ip.clone(),
    };

    let mut tx = state.pool.begin().await?;
    lock::acquire(&mut tx, lock::ROUTE_MERGE_INTAKE, post.id).await?;

    let merge = match input.merge_request_id {
        Some(mid) => {
            let existing =
                MergeRequestRepo::find_owned(&mut *tx, post.id, mid, &input.modifier_email)
                    .await?
                    .ok_or(AppError::Core(CoreError::NotFound {
                        entity: "MergeRequest",
                        id: mid,
                    }))?;
            MergeRequestRepo::overwrite(&mut *tx, existing.id, &create, Utc::now())
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("Resubmission target vanished mid-update".into())
                })?
        }
        None => MergeRequestRepo::create(&mut *tx, &create).await?,
    };

    MessageRepo::create(
        &mut *tx,
        &CreateMessage {
            title: format!(
                "Edit request from {} for \u{201c}{}\u{201d}",
                merge.modifier, post.title
            ),
            content: merge.title.clone(),
            link: Some(format!("/merge-requests/{}/compare", merge.id)),
        },
    )
    .await?;

    tx.commit().await?;

    // Moderator notification is best-effort and strictly after the commit.
    notify_moderators(&state, &post.title, &post.content, &merge);
    state.notifier.publish(
        DomainEvent::new("post.merge.requested")
            .with_post(post.id)
            .with_actor(merge.modifier_email.clone()),
    );

    tracing::info!(
        post_id = post.id,
        merge_request_id = merge.id,
        submitter = %merge.modifier_email,
        "Merge request queued"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: merge })).into_response())
}

/// Fast path: apply the author's own edit, archiving the prior state when
/// the body materially changed.
async fn self_merge(
    state: &AppState,
    post_id: DbId,
    input: &PushMergeRequest,
) -> AppResult<axum::response::Response> {
    let mut tx = state.pool.begin().await?;
    lock::acquire(&mut tx, lock::ROUTE_MERGE_INTAKE, post_id).await?;

    // Re-read under the lock so the archived snapshot is current.
    let post = PostRepo::find_editable(&mut *tx, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id: post_id }))?;

    if similarity::is_material_edit(&post.content, &input.content) {
        RevisionRepo::create(&mut *tx, &CreateRevision::from_post(&post)).await?;
    }

    let update = PostContentUpdate {
        title: input.title.clone(),
        content: input.content.clone(),
        protect_content: post.protect_content.clone(),
        category_id: post.category_id,
        label: post.label.clone(),
        topic_ids: post.topic_ids.clone(),
        modifier: Some(input.modifier.clone()),
        modifier_email: Some(input.modifier_email.clone()),
        modify_date: Utc::now(),
    };
    let updated = PostRepo::apply_content(&mut *tx, post.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id: post_id }))?;

    tx.commit().await?;

    index::sync_add(&state.pool, &updated).await;
    state.notifier.publish(
        DomainEvent::new("post.self_edited")
            .with_post(updated.id)
            .with_actor(input.modifier_email.clone()),
    );

    tracing::info!(post_id = updated.id, "Author self-edit applied without review");
    Ok((
        StatusCode::OK,
        Json(DataResponse {
            data: json!({ "merged": true, "post": updated }),
        }),
    )
        .into_response())
}

/// Render and enqueue the moderator notification for a new merge request.
fn notify_moderators(state: &AppState, post_title: &str, old_content: &str, merge: &MergeRequest) {
    let Some(moderator) = &state.config.moderator_email else {
        return;
    };
    let diff = diff_merge(old_content, &merge.content);
    state.notifier.enqueue(Notification {
        subject: format!(
            "[{}] Edit request for: {}",
            state.config.site_title, post_title
        ),
        body: format!(
            "<p><b>{}</b> proposed changes to \u{201c}{}\u{201d}.</p>\
             <div>{}</div>\
             <p><a href=\"{}/api/v1/merge-requests/{}/compare\">Review side by side</a></p>",
            merge.modifier, post_title, diff, state.config.public_base_url, merge.id
        ),
        recipient: moderator.clone(),
        origin_ip: merge.ip.clone(),
    });
}

// ---------------------------------------------------------------------------
// Lookup / queue
// ---------------------------------------------------------------------------

/// GET /api/v1/posts/{id}/merge/{mid}
///
/// Fetch a submitter's open request on a post (the resubmission view).
pub async fn get_merge_request(
    State(state): State<AppState>,
    Path((id, mid)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    PostRepo::find_editable(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    let merge = MergeRequestRepo::find_for_post(&state.pool, id, mid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "MergeRequest", id: mid }))?;
    Ok(Json(DataResponse { data: merge }))
}

/// GET /api/v1/merge-requests
///
/// Moderation queue listing, oldest submission first. Defaults to pending.
pub async fn list_merge_requests(
    State(state): State<AppState>,
    Query(params): Query<StateFilterParams>,
) -> AppResult<impl IntoResponse> {
    let merge_state = match &params.state {
        Some(s) => MergeState::from_str(s).map_err(AppError::Core)?,
        None => MergeState::Pending,
    };
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let requests =
        MergeRequestRepo::list_by_state(&state.pool, merge_state.as_str(), limit, offset).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/merge-requests/{mid}/compare
///
/// Side-by-side review payload: both the live content and the proposal with
/// inserted/deleted spans marked.
pub async fn compare_merge_request(
    State(state): State<AppState>,
    Path(mid): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let merge = MergeRequestRepo::find_by_id(&state.pool, mid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "MergeRequest", id: mid }))?;
    let post = PostRepo::find_by_id(&state.pool, merge.post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: merge.post_id,
        }))?;

    let (current, proposed) = html_diff(&post.content, &merge.content);
    Ok(Json(DataResponse {
        data: json!({
            "merge_request": merge,
            "post_title": post.title,
            "current": current,
            "proposed": proposed,
        }),
    }))
}

// ---------------------------------------------------------------------------
// Moderator actions
// ---------------------------------------------------------------------------

/// POST /api/v1/merge-requests/{mid}/accept
///
/// Apply the proposal to the post, archive the prior state as a revision,
/// and transition the request to merged.
pub async fn accept_merge_request(
    State(state): State<AppState>,
    Path(mid): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let merge = MergeRequestRepo::find_by_id(&state.pool, mid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "MergeRequest", id: mid }))?;
    let merge_state = MergeState::from_str(&merge.merge_state).map_err(AppError::Core)?;
    if !can_accept(merge_state) {
        return Err(CoreError::Conflict(format!(
            "Only pending merge requests can be accepted (state: {merge_state})"
        ))
        .into());
    }

    let mut tx = state.pool.begin().await?;
    lock::acquire(&mut tx, lock::ROUTE_MERGE_ACCEPT, merge.post_id).await?;

    let post = PostRepo::find_by_id(&mut *tx, merge.post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: merge.post_id,
        }))?;

    let update = PostContentUpdate {
        title: merge.title.clone(),
        content: merge.content.clone(),
        protect_content: post.protect_content.clone(),
        category_id: post.category_id,
        label: post.label.clone(),
        topic_ids: post.topic_ids.clone(),
        modifier: Some(merge.modifier.clone()),
        modifier_email: Some(merge.modifier_email.clone()),
        modify_date: Utc::now(),
    };
    let updated = archive_and_apply(&mut tx, &post, &update).await?;
    MergeRequestRepo::set_state(&mut *tx, merge.id, MergeState::Merged.as_str())
        .await?
        .ok_or_else(|| AppError::InternalError("Merge request vanished mid-accept".into()))?;

    tx.commit().await?;

    if updated.status == "published" {
        index::sync_add(&state.pool, &updated).await;
    }

    state.notifier.publish(
        DomainEvent::new("post.merge.accepted")
            .with_post(updated.id)
            .with_actor(merge.modifier_email.clone()),
    );
    state.notifier.enqueue(Notification {
        subject: format!(
            "[{}] Your edit to \u{201c}{}\u{201d} was published",
            state.config.site_title, updated.title
        ),
        body: format!(
            "<p>Thanks for contributing! Your proposed changes are now live:</p>\
             <p><a href=\"{}/api/v1/posts/{}\">{}</a></p>",
            state.config.public_base_url, updated.id, updated.title
        ),
        recipient: merge.modifier_email.clone(),
        origin_ip: None,
    });

    tracing::info!(
        merge_request_id = merge.id,
        post_id = updated.id,
        "Merge request accepted"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/merge-requests/{mid}/block
///
/// Transition the request to block. This taints the submitter's trust
/// record: every future submission from that email, to any post, is
/// rejected at intake.
pub async fn block_merge_request(
    State(state): State<AppState>,
    Path(mid): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let merge = MergeRequestRepo::find_by_id(&state.pool, mid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "MergeRequest", id: mid }))?;
    let merge_state = MergeState::from_str(&merge.merge_state).map_err(AppError::Core)?;
    if !can_block(merge_state) {
        return Err(CoreError::Conflict(format!(
            "Only pending merge requests can be blocked (state: {merge_state})"
        ))
        .into());
    }

    let blocked = MergeRequestRepo::set_state(&state.pool, merge.id, MergeState::Block.as_str())
        .await?
        .ok_or_else(|| AppError::InternalError("Merge request vanished mid-block".into()))?;

    state.notifier.publish(
        DomainEvent::new("post.merge.blocked")
            .with_post(blocked.post_id)
            .with_actor(blocked.modifier_email.clone()),
    );

    tracing::info!(
        merge_request_id = blocked.id,
        submitter = %blocked.modifier_email,
        "Merge request blocked; submitter blacklisted"
    );
    Ok(Json(DataResponse { data: blocked }))
}

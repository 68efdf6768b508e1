//! Handlers for authoring, anonymous submission, and editing posts.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use validator::ValidateEmail;

use quill_core::error::CoreError;
use quill_core::moderation::{
    self, normalize_label, normalize_protect_content, scan_banned_keywords, PostStatus,
    RegionLimitMode,
};
use quill_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use quill_core::similarity;
use quill_core::types::DbId;
use quill_db::models::post::{
    CreatePost, EditPostRequest, Post, PostCommand, PostContentUpdate, SubmitPostRequest,
    WritePostRequest,
};
use quill_db::models::revision::CreateRevision;
use quill_db::repositories::{
    CategoryRepo, CodeRepo, CommentRepo, KeywordRepo, PostRepo, RevisionRepo, TopicRepo,
};
use quill_events::{DomainEvent, Notification};

use crate::error::{AppError, AppResult};
use crate::index;
use crate::lock;
use crate::query::PostListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

/// Normalized submission fields after trust-gate validation.
pub struct NormalizedCommand {
    pub label: Option<String>,
    pub protect_content: Option<String>,
    pub limit_mode: String,
    pub regions: Option<String>,
    pub except_regions: Option<String>,
}

/// Validate a [`PostCommand`] against category, topics, and region config,
/// returning the normalized optional fields.
pub async fn validate_post_command(
    state: &AppState,
    cmd: &PostCommand,
) -> AppResult<NormalizedCommand> {
    if cmd.title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()).into());
    }

    if !CategoryRepo::exists_available(&state.pool, cmd.category_id).await? {
        return Err(CoreError::Validation("Please choose a category".into()).into());
    }

    if !TopicRepo::all_exist(&state.pool, &cmd.topic_ids).await? {
        return Err(CoreError::Validation("One or more topics do not exist".into()).into());
    }

    let limit_mode = match &cmd.limit_mode {
        Some(mode) => RegionLimitMode::from_str(mode).map_err(AppError::Core)?,
        None => RegionLimitMode::default(),
    };
    let (regions, except_regions) = moderation::validate_region_config(
        limit_mode,
        cmd.regions.as_deref(),
        cmd.except_regions.as_deref(),
    )
    .map_err(AppError::Core)?;

    Ok(NormalizedCommand {
        label: normalize_label(cmd.label.as_deref()),
        protect_content: normalize_protect_content(cmd.protect_content.as_deref()),
        limit_mode: limit_mode.as_str().to_string(),
        regions,
        except_regions,
    })
}

/// Run the abuse gate for anonymous submissions: email blacklist then
/// banned-keyword scan. Side-effect-free; short-circuits on first failure.
async fn check_submission_gate(state: &AppState, cmd: &PostCommand) -> AppResult<()> {
    if PostRepo::exists_forbidden_by_email(&state.pool, &cmd.email).await? {
        return Err(CoreError::Blacklisted(
            "This email has been blacklisted for abusive submissions; contact the site \
             operator if you believe this is a mistake"
                .into(),
        )
        .into());
    }

    let patterns = KeywordRepo::list_patterns(&state.pool).await?;
    let combined = format!("{} {} {}", cmd.title, cmd.author, cmd.content);
    if let Some(term) = scan_banned_keywords(&combined, &patterns) {
        tracing::info!(
            title = %cmd.title,
            author = %cmd.author,
            matched = %term,
            "Submission rejected by keyword scan"
        );
        return Err(CoreError::Validation(
            "The submission contains a banned term and cannot be published".into(),
        )
        .into());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/posts
///
/// Direct authoring endpoint: the post goes live immediately, or enters the
/// schedule queue when `schedule` is set with a future `publish_at`.
pub async fn write_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<WritePostRequest>,
) -> AppResult<impl IntoResponse> {
    let normalized = validate_post_command(&state, &input.post).await?;
    let now = Utc::now();

    let (status, post_date) = if input.schedule {
        let publish_at = input
            .publish_at
            .filter(|t| *t > now)
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Scheduled publication requires a future publish_at".into(),
                ))
            })?;
        (PostStatus::Schedule, publish_at)
    } else {
        (PostStatus::Published, now)
    };

    let create = CreatePost {
        title: input.post.title.clone(),
        content: input.post.content.clone(),
        protect_content: normalized.protect_content,
        status: status.as_str().to_string(),
        author: input.post.author.clone(),
        email: input.post.email.clone(),
        modifier: Some(input.post.author.clone()),
        modifier_email: Some(input.post.email.clone()),
        category_id: input.post.category_id,
        label: normalized.label,
        topic_ids: input.post.topic_ids.clone(),
        disable_copy: false,
        limit_mode: normalized.limit_mode,
        regions: normalized.regions,
        except_regions: normalized.except_regions,
        ip: super::client_ip(&headers),
        post_date,
        modify_date: post_date,
    };
    let post = PostRepo::create(&state.pool, &create).await?;

    if status == PostStatus::Published {
        index::sync_add(&state.pool, &post).await;
    }

    state.notifier.publish(
        DomainEvent::new(match status {
            PostStatus::Schedule => "post.scheduled",
            _ => "post.published",
        })
        .with_post(post.id)
        .with_actor(post.email.clone()),
    );

    tracing::info!(post_id = post.id, status = %post.status, "Post written");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// POST /api/v1/posts/submit
///
/// Anonymous submission endpoint: verification code, abuse gate, then a
/// pending post awaiting moderation.
pub async fn submit_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SubmitPostRequest>,
) -> AppResult<impl IntoResponse> {
    if !input.post.email.validate_email() {
        return Err(CoreError::Validation("A valid email address is required".into()).into());
    }

    if !CodeRepo::consume(&state.pool, &input.post.email, &input.code).await? {
        return Err(CoreError::InvalidCode.into());
    }

    check_submission_gate(&state, &input.post).await?;
    let normalized = validate_post_command(&state, &input.post).await?;

    let now = Utc::now();
    let create = CreatePost {
        title: input.post.title.clone(),
        content: input.post.content.clone(),
        protect_content: normalized.protect_content,
        status: PostStatus::Pending.as_str().to_string(),
        author: input.post.author.clone(),
        email: input.post.email.clone(),
        modifier: Some(input.post.author.clone()),
        modifier_email: Some(input.post.email.clone()),
        category_id: input.post.category_id,
        label: normalized.label,
        topic_ids: input.post.topic_ids.clone(),
        // Visitor submissions default to copy protection.
        disable_copy: true,
        limit_mode: normalized.limit_mode,
        regions: normalized.regions,
        except_regions: normalized.except_regions,
        ip: super::client_ip(&headers),
        post_date: now,
        modify_date: now,
    };
    let post = PostRepo::create(&state.pool, &create).await?;

    state.notifier.publish(
        DomainEvent::new("post.submitted")
            .with_post(post.id)
            .with_actor(post.email.clone()),
    );
    if let Some(moderator) = &state.config.moderator_email {
        state.notifier.enqueue(Notification {
            subject: format!("[{}] New visitor submission: {}", state.config.site_title, post.title),
            body: format!(
                "<p>A visitor submitted <b>{}</b> at {}.</p>\
                 <p><a href=\"{}/api/v1/posts/{}\">Review the submission</a></p>",
                post.title,
                now.format("%Y-%m-%d %H:%M:%S"),
                state.config.public_base_url,
                post.id
            ),
            recipient: moderator.clone(),
            origin_ip: post.ip.clone(),
        });
    }

    tracing::info!(post_id = post.id, email = %post.email, "Visitor submission accepted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(DataResponse { data: post }))
}

/// GET /api/v1/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        PostStatus::from_str(status).map_err(AppError::Core)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let posts = PostRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// Content of the system notice inserted when a major title change makes
/// prior comments refer to an older incarnation of the post.
fn title_reset_notice(old_title: &str) -> String {
    format!(
        "<p>Note: this post has been substantially revised. Comments above this \
         marker refer to the earlier text titled \u{201c}{old_title}\u{201d}; see the \
         post's revision history for details.</p>"
    )
}

/// POST /api/v1/posts/{id}/edit
///
/// Author/moderator edit. With `reserve` set on a published post, the
/// pre-edit state is archived first (when the body materially changed) and
/// a large title change drops a reset-point notice into the comments.
pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EditPostRequest>,
) -> AppResult<impl IntoResponse> {
    let normalized = validate_post_command(&state, &input.post).await?;
    let has_comments = CommentRepo::has_comments(&state.pool, id).await?;

    let mut tx = state.pool.begin().await?;
    lock::acquire(&mut tx, lock::ROUTE_EDIT, id).await?;

    let post = PostRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    let reserved = input.reserve && post.status == PostStatus::Published.as_str();
    let mut archived = false;
    if reserved {
        if similarity::is_material_edit(&post.content, &input.post.content) {
            RevisionRepo::create(&mut *tx, &CreateRevision::from_post(&post)).await?;
            archived = true;
        }
        if similarity::is_title_reset(&post.title, &input.post.title) && has_comments {
            CommentRepo::create_system_notice(
                &mut *tx,
                post.id,
                &post.email,
                &title_reset_notice(&post.title),
            )
            .await?;
        }
    }

    let update = PostContentUpdate {
        title: input.post.title.clone(),
        content: input.post.content.clone(),
        protect_content: normalized.protect_content,
        category_id: input.post.category_id,
        label: normalized.label,
        topic_ids: input.post.topic_ids.clone(),
        modifier: input.modifier.clone().or_else(|| Some(post.author.clone())),
        modifier_email: input
            .modifier_email
            .clone()
            .or_else(|| Some(post.email.clone())),
        modify_date: if reserved { Utc::now() } else { post.modify_date },
    };
    let updated = PostRepo::apply_content(&mut *tx, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;

    tx.commit().await?;

    if updated.status == PostStatus::Published.as_str() {
        index::sync_add(&state.pool, &updated).await;
    }

    state.notifier.publish(
        DomainEvent::new("post.edited")
            .with_post(updated.id)
            .with_payload(serde_json::json!({ "archived": archived })),
    );

    tracing::info!(post_id = updated.id, archived, "Post edited");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/posts/{id}
///
/// Hard delete. Revisions, merge requests, comments, and the search row are
/// removed by cascade.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PostRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "Post", id }.into());
    }

    state.notifier.publish(DomainEvent::new("post.deleted").with_post(id));
    tracing::info!(post_id = id, "Post hard-deleted");
    Ok(Json(DataResponse { data: serde_json::json!({ "deleted": true }) }))
}

// ---------------------------------------------------------------------------
// Internal helpers shared with the merge handlers
// ---------------------------------------------------------------------------

/// Apply replacement content to a post inside an open transaction,
/// archiving the prior state first.
pub(crate) async fn archive_and_apply(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    post: &Post,
    update: &PostContentUpdate,
) -> Result<Post, AppError> {
    RevisionRepo::create(&mut **tx, &CreateRevision::from_post(post)).await?;
    let updated = PostRepo::apply_content(&mut **tx, post.id, update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id: post.id }))?;
    Ok(updated)
}

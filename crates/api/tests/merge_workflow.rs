//! HTTP-level integration tests for the collaborative merge workflow:
//! intake gates, the author fast path, the moderation queue, and the
//! global blacklist.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, post_json, seed_category, seed_code, seed_published_post,
};
use quill_db::repositories::{MergeRequestRepo, PostRepo, RevisionRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Scenario: third-party submission creates a pending request, no mutation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn third_party_submission_creates_pending_request(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["merge_state"], "pending");
    assert_eq!(body["data"]["content"], "Hello world");

    // The live post is untouched until a moderator accepts.
    let live = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(live.content, "Hello");
    assert_eq!(
        RevisionRepo::count_by_post(&pool, post.id).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Scenario: the author's own submission applies directly
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn author_fast_path_applies_and_archives(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "a@x.com", "123456").await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello there",
            "modifier": "Ada",
            "modifier_email": "a@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let live = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(live.content, "Hello there");

    // Exactly one revision holding the pre-edit body, and no request row.
    let revisions = RevisionRepo::list_by_post(&pool, post.id, true, 10, 0)
        .await
        .unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].content, "Hello");
    let queue = MergeRequestRepo::list_by_state(&pool, "pending", 10, 0)
        .await
        .unwrap();
    assert!(queue.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn author_title_only_edit_archives_nothing(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "a@x.com", "123456").await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A renamed post",
            "content": "Hello",
            "modifier": "Ada",
            "modifier_email": "a@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let live = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(live.title, "A renamed post");
    // Unchanged body: nothing worth archiving.
    assert_eq!(
        RevisionRepo::count_by_post(&pool, post.id).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Intake gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_code_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "000000",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_CODE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_cannot_be_reused(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    let first = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello wonderful world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // The code was consumed by the first call.
    let second = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello wonderful world again",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["code"], "INVALID_CODE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn noop_change_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello world",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    // Identical title, markup-only body churn: below the materiality bar.
    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello   world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "NO_OP_CHANGE");

    let queue = MergeRequestRepo::list_by_state(&pool, "pending", 10, 0)
        .await
        .unwrap();
    assert!(queue.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublished_or_locked_posts_reject_proposals(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    PostRepo::toggle_locked(&pool, post.id).await.unwrap();
    seed_code(&pool, "b@x.com", "123456").await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blind_duplicate_while_pending_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;

    seed_code(&pool, "b@x.com", "111111").await;
    let first = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "111111",
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    seed_code(&pool, "b@x.com", "222222").await;
    let second = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello brave new world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "222222",
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "DUPLICATE_PENDING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resubmission_overwrites_pending_request(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;

    seed_code(&pool, "b@x.com", "111111").await;
    let first = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "111111",
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_id = body_json(first).await["data"]["id"].as_i64().unwrap();

    // Resubmitting against the existing request overwrites it in place.
    seed_code(&pool, "b@x.com", "222222").await;
    let second = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello revised world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "222222",
            "merge_request_id": first_id,
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let body = body_json(second).await;
    assert_eq!(body["data"]["id"].as_i64().unwrap(), first_id);
    assert_eq!(body["data"]["content"], "Hello revised world");

    assert_eq!(
        MergeRequestRepo::count_pending(&pool, post.id, "b@x.com")
            .await
            .unwrap(),
        1
    );
}

// ---------------------------------------------------------------------------
// Moderator actions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_applies_content_and_archives(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A better post",
            "content": "Hello world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    let mid = body_json(response).await["data"]["id"].as_i64().unwrap();

    let accept = common::post_empty(
        app.clone(),
        &format!("/api/v1/merge-requests/{mid}/accept"),
    )
    .await;
    assert_eq!(accept.status(), StatusCode::OK);

    let live = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(live.title, "A better post");
    assert_eq!(live.content, "Hello world");
    assert_eq!(live.modifier_email.as_deref(), Some("b@x.com"));

    // The prior state was archived.
    let revisions = RevisionRepo::list_by_post(&pool, post.id, true, 10, 0)
        .await
        .unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].content, "Hello");

    let merged = MergeRequestRepo::find_by_id(&pool, mid).await.unwrap().unwrap();
    assert_eq!(merged.merge_state, "merged");

    // Merged is terminal: a second accept conflicts.
    let again = common::post_empty(app, &format!("/api/v1/merge-requests/{mid}/accept")).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn block_blacklists_submitter_everywhere(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "Hello",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "Hello spam world",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    let mid = body_json(response).await["data"]["id"].as_i64().unwrap();

    let block = common::post_empty(
        app.clone(),
        &format!("/api/v1/merge-requests/{mid}/block"),
    )
    .await;
    assert_eq!(block.status(), StatusCode::OK);

    // A fresh submission to a document the submitter never touched is
    // rejected with the blacklist reason.
    let other = seed_published_post(
        &pool, category.id, "Eve", "e@x.com", "Another post", "Other content",
    )
    .await;
    seed_code(&pool, "b@x.com", "654321").await;
    let rejected = post_json(
        app,
        &format!("/api/v1/posts/{}/merge", other.id),
        json!({
            "title": "Another post",
            "content": "Other content plus changes",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "654321",
        }),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(rejected).await["code"], "BLACKLISTED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn compare_renders_annotated_sides(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "A post", "<p>Hello old world</p>",
    )
    .await;
    seed_code(&pool, "b@x.com", "123456").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/merge", post.id),
        json!({
            "title": "A post",
            "content": "<p>Hello new world</p>",
            "modifier": "Bob",
            "modifier_email": "b@x.com",
            "code": "123456",
        }),
    )
    .await;
    let mid = body_json(response).await["data"]["id"].as_i64().unwrap();

    let compare = common::get(app, &format!("/api/v1/merge-requests/{mid}/compare")).await;
    assert_eq!(compare.status(), StatusCode::OK);
    let body = body_json(compare).await;
    assert!(body["data"]["current"]
        .as_str()
        .unwrap()
        .contains("<del>old</del>"));
    assert!(body["data"]["proposed"]
        .as_str()
        .unwrap()
        .contains("<ins>new</ins>"));
}

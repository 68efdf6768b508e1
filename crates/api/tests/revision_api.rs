//! HTTP-level integration tests for the revision history surface: archive
//! on reserve-edit, listing, comparison, revert, and delete.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, seed_category, seed_published_post};
use quill_db::repositories::{CommentRepo, RevisionRepo};
use serde_json::json;
use sqlx::PgPool;

/// Edit request body replacing the post's content.
fn edit_body(category_id: i64, title: &str, content: &str) -> serde_json::Value {
    json!({
        "title": title,
        "content": content,
        "author": "Ada",
        "email": "a@x.com",
        "category_id": category_id,
        "reserve": true,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_edit_archives_prior_state(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "Original", "<p>Original body</p>",
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(category.id, "Original", "<p>Rewritten body</p>"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let history = get(app, &format!("/api/v1/posts/{}/history", post.id)).await;
    let body = body_json(history).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(
        body["data"]["revisions"][0]["content"],
        "<p>Original body</p>"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_edit_without_body_change_archives_nothing(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "Original", "<p>Body</p>",
    )
    .await;

    // Markup churn only; the normalized body is unchanged.
    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(category.id, "Original", "<div>Body</div>"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        RevisionRepo::count_by_post(&pool, post.id).await.unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revert_restores_archived_state_and_consumes_revision(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "Original title", "<p>Original</p>",
    )
    .await;

    post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(category.id, "Edited title", "<p>Edited</p>"),
    )
    .await;

    let revisions = RevisionRepo::list_by_post(&pool, post.id, true, 10, 0)
        .await
        .unwrap();
    let revision = &revisions[0];

    let revert = common::post_empty(
        app.clone(),
        &format!("/api/v1/posts/{}/history/{}/revert", post.id, revision.id),
    )
    .await;
    assert_eq!(revert.status(), StatusCode::OK);
    let body = body_json(revert).await;
    assert_eq!(body["data"]["title"], "Original title");
    assert_eq!(body["data"]["content"], "<p>Original</p>");

    // The consumed revision is gone, and the pre-revert state was NOT
    // re-archived: reverts are not themselves undoable.
    assert_eq!(
        RevisionRepo::count_by_post(&pool, post.id).await.unwrap(),
        0
    );

    // modify_date came back exactly as archived.
    let restored = quill_db::repositories::PostRepo::find_by_id(&pool, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.modify_date, revision.modify_date);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn compare_marks_changes_between_live_and_revision(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "Title", "<p>the old words</p>",
    )
    .await;

    post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(category.id, "Title", "<p>the new words</p>"),
    )
    .await;
    let revisions = RevisionRepo::list_by_post(&pool, post.id, true, 10, 0)
        .await
        .unwrap();

    // Left = archived revision, right = live post.
    let compare = get(
        app,
        &format!(
            "/api/v1/posts/{}/history/compare?left={}&right=0",
            post.id, revisions[0].id
        ),
    )
    .await;
    assert_eq!(compare.status(), StatusCode::OK);
    let body = body_json(compare).await;
    assert!(body["data"]["left"]["content"]
        .as_str()
        .unwrap()
        .contains("<del>old</del>"));
    assert!(body["data"]["right"]["content"]
        .as_str()
        .unwrap()
        .contains("<ins>new</ins>"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_revision_via_api(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool, category.id, "Ada", "a@x.com", "Title", "<p>v1</p>",
    )
    .await;

    post_json(
        app.clone(),
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(category.id, "Title", "<p>v2</p>"),
    )
    .await;
    let revisions = RevisionRepo::list_by_post(&pool, post.id, true, 10, 0)
        .await
        .unwrap();

    let response = common::delete(
        app.clone(),
        &format!("/api/v1/posts/{}/history/{}", post.id, revisions[0].id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let missing = get(
        app,
        &format!("/api/v1/posts/{}/history/{}", post.id, revisions[0].id),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn big_title_change_drops_reset_notice_for_commented_posts(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let category = seed_category(&pool, "general").await;
    let post = seed_published_post(
        &pool,
        category.id,
        "Ada",
        "a@x.com",
        "My favourite hiking trails in the alps",
        "<p>Body</p>",
    )
    .await;
    // An existing reader comment makes the annotation necessary.
    CommentRepo::create_system_notice(&pool, post.id, "reader@x.com", "first!")
        .await
        .unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/posts/{}/edit", post.id),
        edit_body(
            category.id,
            "Benchmarking async runtimes under production load",
            "<p>Entirely new body text</p>",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let comments = CommentRepo::list_by_post(&pool, post.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments[1].is_system);
    assert!(comments[1].content.contains("revision history"));
}

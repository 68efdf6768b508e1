//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the same router + middleware stack as `main.rs` (via
//! `build_app_router`) and provides small request/response helpers on top
//! of `tower::ServiceExt::oneshot`.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use quill_api::config::ServerConfig;
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_events::{EventBus, Notifier};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        site_title: "Quill Test".to_string(),
        public_base_url: "http://localhost:3000".to_string(),
        moderator_email: Some("moderator@example.com".to_string()),
        code_ttl_secs: 86_400,
        code_resend_window_secs: 120,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// SMTP is left unconfigured, so notification enqueues are logged and
/// dropped rather than attempting delivery.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let notifier = Notifier::new(Arc::clone(&event_bus), None);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        notifier,
    };
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with no body.
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

use chrono::Utc;
use quill_db::models::category::Category;
use quill_db::models::post::{CreatePost, Post};
use quill_db::repositories::{CategoryRepo, CodeRepo, PostRepo};

/// Create a category to attach posts to.
pub async fn seed_category(pool: &PgPool, name: &str) -> Category {
    CategoryRepo::create(pool, name).await.unwrap()
}

/// Create a published, unlocked post owned by the given author.
pub async fn seed_published_post(
    pool: &PgPool,
    category_id: i64,
    author: &str,
    email: &str,
    title: &str,
    content: &str,
) -> Post {
    let now = Utc::now();
    PostRepo::create(
        pool,
        &CreatePost {
            title: title.to_string(),
            content: content.to_string(),
            protect_content: None,
            status: "published".to_string(),
            author: author.to_string(),
            email: email.to_string(),
            modifier: Some(author.to_string()),
            modifier_email: Some(email.to_string()),
            category_id,
            label: None,
            topic_ids: vec![],
            disable_copy: false,
            limit_mode: "all".to_string(),
            regions: None,
            except_regions: None,
            ip: None,
            post_date: now,
            modify_date: now,
        },
    )
    .await
    .unwrap()
}

/// Issue a verification code directly, bypassing the HTTP endpoint (the
/// real code only ever travels by email).
pub async fn seed_code(pool: &PgPool, email: &str, code: &str) {
    CodeRepo::issue(pool, email, code, 86_400).await.unwrap();
}

//! Taxonomy and keyword-set administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use quill_core::error::CoreError;
use quill_core::types::DbId;
use quill_db::models::banned_keyword::CreateBannedKeyword;
use quill_db::models::category::CreateCategory;
use quill_db::models::topic::CreateTopic;
use quill_db::repositories::{CategoryRepo, KeywordRepo, TopicRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Category name must not be empty".into()).into());
    }
    let category = CategoryRepo::create(&state.pool, input.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/admin/topics
pub async fn list_topics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let topics = TopicRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: topics }))
}

/// POST /api/v1/admin/topics
pub async fn create_topic(
    State(state): State<AppState>,
    Json(input): Json<CreateTopic>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("Topic title must not be empty".into()).into());
    }
    let topic = TopicRepo::create(&state.pool, input.title.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: topic })))
}

/// GET /api/v1/admin/banned-keywords
pub async fn list_banned_keywords(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let patterns = KeywordRepo::list_patterns(&state.pool).await?;
    Ok(Json(DataResponse { data: patterns }))
}

/// POST /api/v1/admin/banned-keywords
pub async fn create_banned_keyword(
    State(state): State<AppState>,
    Json(input): Json<CreateBannedKeyword>,
) -> AppResult<impl IntoResponse> {
    if input.pattern.trim().is_empty() {
        return Err(CoreError::Validation("Pattern must not be empty".into()).into());
    }
    let keyword = KeywordRepo::create(&state.pool, input.pattern.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: keyword })))
}

/// DELETE /api/v1/admin/banned-keywords/{id}
pub async fn delete_banned_keyword(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !KeywordRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "BannedKeyword", id }.into());
    }
    Ok(Json(DataResponse { data: json!({ "deleted": true }) }))
}

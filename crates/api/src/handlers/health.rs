//! Liveness and readiness probes.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Returns 200 with a database round trip so orchestration can tell a live
/// process from a ready one.
pub async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    quill_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}

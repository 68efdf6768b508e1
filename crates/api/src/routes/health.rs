//! Root-level health route.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// ```text
/// GET /health    database round-trip probe
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

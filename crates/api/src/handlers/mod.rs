//! HTTP handler modules, one per surface area.

pub mod admin;
pub mod health;
pub mod history;
pub mod merge;
pub mod moderation;
pub mod posts;
pub mod search;
pub mod token;

use axum::http::HeaderMap;

/// Best-effort client IP for audit fields, taken from `X-Forwarded-For`.
///
/// The service is expected to sit behind a reverse proxy; without the
/// header the IP is simply recorded as unknown.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

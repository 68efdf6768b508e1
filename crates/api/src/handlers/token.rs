//! Verification code issuance.
//!
//! Submitters prove control of their email address with a one-time code;
//! the merge intake and submission endpoints consume it atomically.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::json;
use validator::ValidateEmail;

use quill_core::error::CoreError;
use quill_db::models::verification_code::IssueCodeRequest;
use quill_db::repositories::CodeRepo;
use quill_events::Notification;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of generated verification codes.
const CODE_LEN: usize = 6;

/// Generate a random alphanumeric code.
fn generate_code() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// POST /api/v1/verification-code
///
/// Issue a one-time code to the given email. Re-issuance within the resend
/// window is rejected; the code itself only travels by email.
pub async fn issue_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<IssueCodeRequest>,
) -> AppResult<impl IntoResponse> {
    if !input.email.validate_email() {
        return Err(CoreError::Validation("A valid email address is required".into()).into());
    }

    if CodeRepo::issued_recently(&state.pool, &input.email, state.config.code_resend_window_secs)
        .await?
    {
        return Err(CoreError::Conflict(format!(
            "A code was sent recently; please wait {} seconds and check your inbox \
             (including spam) before requesting another",
            state.config.code_resend_window_secs
        ))
        .into());
    }

    let code = generate_code();
    CodeRepo::issue(&state.pool, &input.email, &code, state.config.code_ttl_secs).await?;

    let ttl_hours = state.config.code_ttl_secs / 3600;
    state.notifier.enqueue(Notification {
        subject: format!("[{}] Your verification code", state.config.site_title),
        body: format!(
            "<p>Your verification code is <b style=\"color:red\">{code}</b>. \
             It is valid for {ttl_hours}h and can be used once.</p>"
        ),
        recipient: input.email.clone(),
        origin_ip: super::client_ip(&headers),
    });

    tracing::info!(email = %input.email, "Verification code issued");
    Ok(Json(DataResponse { data: json!({ "sent": true }) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_expected_shape() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn generated_codes_vary() {
        // Collisions are possible but vanishingly unlikely across ten draws.
        let codes: std::collections::HashSet<String> =
            (0..10).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }
}

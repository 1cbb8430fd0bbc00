use axum::{extract::State, http::header, response::Json};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::dto::CsrfTokenResponse;

/// GET /api/csrf
/// Mint a CSRF token, set it as the `csrf_token` cookie and return it
#[utoipa::path(
    get,
    path = "/api/csrf",
    tag = "csrf",
    responses(
        (status = 200, description = "Token issued", body = CsrfTokenResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn csrf_token_handler(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, header::HeaderValue); 1], Json<serde_json::Value>), ApiError> {
    let (token, cookie) = state.csrf_guard.issue()?;

    let body = json!({
        "success": true,
        "data": CsrfTokenResponse {
            csrf_token: token.into_string(),
        },
    });

    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::middleware::cookies::get_cookie_value;
use crate::api::router::AppState;
use crate::application::dto::{SignInForm, SignInResponse, SignUpForm, SignUpResponse};
use crate::application::errors::SignOutError;

/// Cookie holding the backend session token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// POST /api/auth/signup
/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignUpForm, content_type = "application/x-www-form-urlencoded"),
    params(
        ("x-csrf-token" = String, Header, description = "Must equal the csrf_token cookie")
    ),
    responses(
        (status = 200, description = "Account created, confirmation e-mail sent", body = SignUpResponse),
        (status = 400, description = "Validation failed or sign-up rejected"),
        (status = 403, description = "Invalid CSRF token"),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn sign_up_handler(
    State(state): State<AppState>,
    form: Result<Form<SignUpForm>, FormRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Form(form) = form?;
    let response = state.sign_up_use_case.execute(&form).await?;

    Ok(Json(json!({
        "success": true,
        "data": response,
    })))
}

/// POST /api/auth/signin
/// Sign in with e-mail and password; the session token is set as a cookie
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "auth",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    params(
        ("x-csrf-token" = String, Header, description = "Must equal the csrf_token cookie")
    ),
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Invalid CSRF token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn sign_in_handler(
    State(state): State<AppState>,
    form: Result<Form<SignInForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form?;
    let session = state.sign_in_use_case.execute(&form).await?;

    let cookie = state
        .session_cookie
        .set_cookie(
            ACCESS_TOKEN_COOKIE,
            &session.access_token,
            session.expires_in,
        )
        .map_err(ApiError::unexpected)?;

    let body = json!({
        "success": true,
        "data": SignInResponse { user: session.user },
    });

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/auth/signout
/// End the current session and clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "auth",
    params(
        ("x-csrf-token" = String, Header, description = "Must equal the csrf_token cookie")
    ),
    responses(
        (status = 200, description = "Signed out"),
        (status = 400, description = "Sign-out rejected by the auth backend; the session cookie is still cleared"),
        (status = 403, description = "Invalid CSRF token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn sign_out_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let access_token = get_cookie_value(&headers, ACCESS_TOKEN_COOKIE);
    let outcome = state
        .sign_out_use_case
        .execute(access_token.as_deref())
        .await;

    let cleared = state
        .session_cookie
        .expire(ACCESS_TOKEN_COOKIE)
        .map_err(ApiError::unexpected)?;

    match outcome {
        Ok(()) => Ok((
            [(header::SET_COOKIE, cleared)],
            Json(json!({ "success": true })),
        )
            .into_response()),
        // Cleared even when the backend refuses the token
        Err(SignOutError::Rejected(message)) => {
            Ok(([(header::SET_COOKIE, cleared)], ApiError::bad_request(message)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Fallback for any method other than POST on the auth routes
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::method_not_allowed()
}

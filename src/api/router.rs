use std::sync::Arc;

use axum::{
    http::header,
    middleware as axum_middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    sensitive_headers::{SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer},
};

use crate::api::handlers::{
    csrf_token_handler, health_handler, method_not_allowed_handler, sign_in_handler,
    sign_out_handler, sign_up_handler,
};
use crate::api::middleware::{
    cookies::CookieAttributes,
    create_error_handling_middleware,
    csrf::{csrf_protection, CsrfGuard, CSRF_HEADER_NAME},
    request_logging_middleware, security_headers_middleware, SecurityHeaderSet,
};
use crate::api::openapi::swagger_ui;
use crate::application::use_cases::{SignInUseCase, SignOutUseCase, SignUpUseCase};

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub sign_up_use_case: Arc<SignUpUseCase>,
    pub sign_in_use_case: Arc<SignInUseCase>,
    pub sign_out_use_case: Arc<SignOutUseCase>,
    pub csrf_guard: Arc<CsrfGuard>,
    pub security_headers: Arc<SecurityHeaderSet>,
    /// Attributes of the `access_token` session cookie
    pub session_cookie: CookieAttributes,
    pub max_form_bytes: usize,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let csrf_guard = Arc::clone(&state.csrf_guard);
    let security_headers = Arc::clone(&state.security_headers);
    let max_form_bytes = state.max_form_bytes;

    // POST only; the CSRF guard also wraps the 405 fallback, so a tokenless
    // PUT or DELETE is refused with 403 before the method is considered
    let auth_route = |handler: MethodRouter<AppState>| -> MethodRouter<AppState> {
        handler
            .fallback(method_not_allowed_handler)
            .layer(axum_middleware::from_fn_with_state(
                Arc::clone(&csrf_guard),
                csrf_protection,
            ))
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/csrf", get(csrf_token_handler))
        .route("/api/auth/signup", auth_route(post(sign_up_handler)))
        .route("/api/auth/signin", auth_route(post(sign_in_handler)))
        .route("/api/auth/signout", auth_route(post(sign_out_handler)))
        .merge(swagger_ui())
        .with_state(state)
        // Innermost first: body limit, hardening headers, 5xx bodies, header
        // redaction, then request logging around everything
        .layer(RequestBodyLimitLayer::new(max_form_bytes))
        .layer(axum_middleware::from_fn_with_state(
            security_headers,
            security_headers_middleware,
        ))
        .layer(create_error_handling_middleware())
        .layer(SetSensitiveResponseHeadersLayer::new([header::SET_COOKIE]))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::COOKIE,
            header::AUTHORIZATION,
            CSRF_HEADER_NAME,
        ]))
        .layer(axum_middleware::from_fn(request_logging_middleware))
}

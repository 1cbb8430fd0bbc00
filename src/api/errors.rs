use std::collections::BTreeMap;

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::middleware::csrf::CsrfError;
use crate::application::errors::{SignInError, SignOutError, SignUpError};
use crate::application::validation::format_validation_errors;
use crate::domain::errors::ValidationErrors;

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";
pub const INVALID_CSRF_MESSAGE: &str = "Invalid CSRF token";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Payload too large";

/// API error response
///
/// Renders as `{"success": false, "error": ..., "details"?: {...}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn invalid_csrf_token() -> Self {
        Self::new(StatusCode::FORBIDDEN, INVALID_CSRF_MESSAGE)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_MESSAGE)
    }

    /// 400 with one message per field path
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            details: Some(format_validation_errors(errors)),
            ..Self::bad_request(INVALID_INPUT_MESSAGE)
        }
    }

    /// 500 with a generic body; `detail` only reaches the server log
    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Unexpected error while handling request");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({
                "success": false,
                "error": self.message,
                "details": details,
            }),
            None => json!({
                "success": false,
                "error": self.message,
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert use case errors to API errors

impl From<SignUpError> for ApiError {
    fn from(err: SignUpError) -> Self {
        match err {
            SignUpError::Validation(errors) => ApiError::validation(&errors),
            SignUpError::Rejected(msg) => ApiError::bad_request(msg),
            SignUpError::Unexpected(detail) => ApiError::unexpected(detail),
        }
    }
}

impl From<SignInError> for ApiError {
    fn from(err: SignInError) -> Self {
        match err {
            SignInError::Validation(errors) => ApiError::validation(&errors),
            SignInError::InvalidCredentials(msg) => ApiError::unauthorized(msg),
            SignInError::Unexpected(detail) => ApiError::unexpected(detail),
        }
    }
}

impl From<SignOutError> for ApiError {
    fn from(err: SignOutError) -> Self {
        match err {
            SignOutError::Rejected(msg) => ApiError::bad_request(msg),
            SignOutError::Unexpected(detail) => ApiError::unexpected(detail),
        }
    }
}

impl From<CsrfError> for ApiError {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::Missing | CsrfError::Mismatch => ApiError::invalid_csrf_token(),
            CsrfError::Cookie(e) => ApiError::unexpected(e),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large()
        } else {
            tracing::debug!(reason = %rejection.body_text(), "Rejected form body");
            ApiError::bad_request("Invalid form data")
        }
    }
}

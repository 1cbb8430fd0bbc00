//! Error types returned by the auth use cases

use thiserror::Error;

use crate::application::ports::AuthBackendError;
use crate::domain::errors::ValidationErrors;

#[derive(Debug, Error)]
pub enum SignUpError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Backend refusal, shown to the user as-is
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<AuthBackendError> for SignUpError {
    fn from(err: AuthBackendError) -> Self {
        match err {
            AuthBackendError::Rejected(message) => SignUpError::Rejected(message),
            AuthBackendError::Unexpected(detail) => SignUpError::Unexpected(detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<AuthBackendError> for SignInError {
    fn from(err: AuthBackendError) -> Self {
        match err {
            AuthBackendError::Rejected(message) => SignInError::InvalidCredentials(message),
            AuthBackendError::Unexpected(detail) => SignInError::Unexpected(detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum SignOutError {
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<AuthBackendError> for SignOutError {
    fn from(err: AuthBackendError) -> Self {
        match err {
            AuthBackendError::Rejected(message) => SignOutError::Rejected(message),
            AuthBackendError::Unexpected(detail) => SignOutError::Unexpected(detail),
        }
    }
}

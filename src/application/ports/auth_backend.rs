use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::application::dto::{AuthSession, SignInCredentials, SignUpCredentials};
#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthBackendError {
    /// The backend refused the request; the message is safe to show users
    #[error("{0}")]
    Rejected(String),

    /// Transport failure, malformed reply or backend-side fault
    #[error("Unexpected auth backend error: {0}")]
    Unexpected(String),
}

/// Port for the hosted authentication service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Register a new account; returns the backend's user payload
    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Value, AuthBackendError>;

    /// Exchange email and password for a session
    async fn sign_in(&self, credentials: &SignInCredentials)
        -> Result<AuthSession, AuthBackendError>;

    /// Revoke the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthBackendError>;
}

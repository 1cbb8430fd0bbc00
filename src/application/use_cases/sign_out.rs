use std::sync::Arc;

use crate::application::errors::SignOutError;
use crate::application::ports::AuthBackend;

/// Use case: End the caller's session
pub struct SignOutUseCase {
    auth_backend: Arc<dyn AuthBackend>,
}

impl SignOutUseCase {
    pub fn new(auth_backend: Arc<dyn AuthBackend>) -> Self {
        Self { auth_backend }
    }

    /// Without an access token there is nothing to revoke and the call
    /// succeeds without reaching the backend.
    pub async fn execute(&self, access_token: Option<&str>) -> Result<(), SignOutError> {
        match access_token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(self.auth_backend.sign_out(token).await?),
            None => {
                tracing::debug!("Sign-out without a session token");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AuthBackendError, MockAuthBackend};

    #[tokio::test]
    async fn test_sign_out_forwards_token() {
        let mut mock_backend = MockAuthBackend::new();
        mock_backend
            .expect_sign_out()
            .withf(|token| token == "token-1")
            .times(1)
            .returning(|_| Ok(()));

        let use_case = SignOutUseCase::new(Arc::new(mock_backend));
        assert!(use_case.execute(Some("token-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_without_token_skips_backend() {
        let mut mock_backend = MockAuthBackend::new();
        mock_backend.expect_sign_out().times(0);

        let use_case = SignOutUseCase::new(Arc::new(mock_backend));
        assert!(use_case.execute(None).await.is_ok());
        assert!(use_case.execute(Some("")).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_backend_rejection() {
        let mut mock_backend = MockAuthBackend::new();
        mock_backend
            .expect_sign_out()
            .returning(|_| Err(AuthBackendError::Rejected("Session expired".to_string())));

        let use_case = SignOutUseCase::new(Arc::new(mock_backend));
        let err = use_case.execute(Some("stale")).await.unwrap_err();

        assert!(matches!(err, SignOutError::Rejected(ref m) if m == "Session expired"));
    }
}

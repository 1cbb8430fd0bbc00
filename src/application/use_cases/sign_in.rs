use std::sync::Arc;

use crate::application::dto::{AuthSession, SignInCredentials, SignInForm};
use crate::application::errors::SignInError;
use crate::application::ports::AuthBackend;
use crate::application::validation::validate_and_sanitize;
use crate::domain::sanitizer::sanitize_json;
use crate::domain::schema::SIGN_IN;

/// Use case: Exchange credentials for a session
pub struct SignInUseCase {
    auth_backend: Arc<dyn AuthBackend>,
}

impl SignInUseCase {
    pub fn new(auth_backend: Arc<dyn AuthBackend>) -> Self {
        Self { auth_backend }
    }

    /// Returns the session with its user payload already escaped
    pub async fn execute(&self, form: &SignInForm) -> Result<AuthSession, SignInError> {
        let record = validate_and_sanitize(&SIGN_IN, &form.to_record())?;
        let credentials = SignInCredentials::from_record(&record);

        let session = self.auth_backend.sign_in(&credentials).await?;

        Ok(AuthSession {
            user: sanitize_json(&session.user),
            ..session
        })
    }
}

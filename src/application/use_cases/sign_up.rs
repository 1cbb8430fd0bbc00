use std::sync::Arc;

use crate::application::dto::{SignUpCredentials, SignUpForm, SignUpResponse};
use crate::application::errors::SignUpError;
use crate::application::ports::AuthBackend;
use crate::application::validation::validate_and_sanitize;
use crate::domain::sanitizer::sanitize_json;
use crate::domain::schema::SIGN_UP;

pub const SIGN_UP_MESSAGE: &str = "Please check your email for verification link";

/// Use case: Register a new account
pub struct SignUpUseCase {
    auth_backend: Arc<dyn AuthBackend>,
    email_redirect_to: String,
}

impl SignUpUseCase {
    /// `public_base_url` is the site origin the confirmation link returns to
    pub fn new(auth_backend: Arc<dyn AuthBackend>, public_base_url: &str) -> Self {
        Self {
            auth_backend,
            email_redirect_to: format!("{}/auth/callback", public_base_url.trim_end_matches('/')),
        }
    }

    pub fn email_redirect_to(&self) -> &str {
        &self.email_redirect_to
    }

    /// Execute sign-up workflow
    pub async fn execute(&self, form: &SignUpForm) -> Result<SignUpResponse, SignUpError> {
        // 1. Validate, then escape every string field
        let record = validate_and_sanitize(&SIGN_UP, &form.to_record())?;

        // 2. Register with the backend
        let credentials = SignUpCredentials::from_record(&record, self.email_redirect_to.clone());
        let user = self.auth_backend.sign_up(&credentials).await.map_err(|e| {
            tracing::info!(error = %e, "Auth backend sign-up failed");
            e
        })?;

        // 3. Never echo backend data unescaped
        Ok(SignUpResponse {
            message: SIGN_UP_MESSAGE.to_string(),
            user: sanitize_json(&user),
        })
    }
}

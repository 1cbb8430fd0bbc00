//! Client for a Supabase-compatible GoTrue auth API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::application::dto::{AuthSession, SignInCredentials, SignUpCredentials};
use crate::application::ports::{AuthBackend, AuthBackendError};

const FALLBACK_ERROR_MESSAGE: &str = "Authentication request failed";

/// Token grant body returned by `/auth/v1/token`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
    #[serde(default)]
    user: Value,
}

fn default_expires_in() -> u64 {
    3600
}

pub struct HttpAuthBackend {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl HttpAuthBackend {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthBackendError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthBackendError::Unexpected(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn post(&self, url: &str, bearer: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, AuthBackendError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Auth backend request timed out");
                AuthBackendError::Unexpected("request timed out".to_string())
            } else {
                error!(error = %e, "Auth backend request failed");
                AuthBackendError::Unexpected(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(classify_failure(status, &body))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Value, AuthBackendError> {
        let url = self.endpoint("signup");
        debug!(email = %credentials.email, "Registering account with auth backend");

        let request = self
            .post(&url, &self.anon_key)
            .query(&[("redirect_to", credentials.email_redirect_to.as_str())])
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "data": credentials.user_metadata(),
            }));

        let body: Value = self.send(request).await?.json().await.map_err(|e| {
            AuthBackendError::Unexpected(format!("Invalid sign-up response: {}", e))
        })?;

        // Auto-confirming projects answer with a session wrapping the user
        Ok(match body.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => body,
        })
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AuthSession, AuthBackendError> {
        let url = self.endpoint("token");

        let request = self
            .post(&url, &self.anon_key)
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));

        let token: TokenResponse = self.send(request).await?.json().await.map_err(|e| {
            AuthBackendError::Unexpected(format!("Invalid token response: {}", e))
        })?;

        Ok(AuthSession {
            user: token.user,
            access_token: token.access_token,
            expires_in: token.expires_in,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthBackendError> {
        let url = self.endpoint("logout");
        self.send(self.post(&url, access_token)).await?;
        Ok(())
    }
}

/// Map a non-2xx reply to the port's error split.
///
/// 4xx replies carry a user-facing message; everything else is unexpected.
fn classify_failure(status: StatusCode, body: &Value) -> AuthBackendError {
    if status.is_client_error() {
        let message = extract_error_message(body);
        warn!(status = status.as_u16(), %message, "Auth backend rejected request");
        AuthBackendError::Rejected(message)
    } else {
        error!(status = status.as_u16(), "Auth backend returned server error");
        AuthBackendError::Unexpected(format!("auth backend returned HTTP {}", status))
    }
}

/// First non-empty message among the fields GoTrue uses across versions
fn extract_error_message(body: &Value) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_string()
}

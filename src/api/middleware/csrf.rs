//! Double-submit CSRF protection
//!
//! A mutating request must carry the same token in the `x-csrf-token`
//! header and the `csrf_token` cookie. After a successful mutating request
//! the token is rotated: a fresh value is set as the cookie and echoed in
//! the response header.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::cookies::{get_cookie_value, CookieAttributes, SameSite};
use crate::api::errors::ApiError;
use crate::domain::csrf_token::{tokens_match, CsrfToken};

pub const CSRF_COOKIE_NAME: &str = "csrf_token";
pub const CSRF_HEADER_NAME: HeaderName = HeaderName::from_static("x-csrf-token");
pub const CSRF_FORM_FIELD: &str = "csrf_token";

#[derive(Debug, Error)]
pub enum CsrfError {
    #[error("CSRF token missing from header or cookie")]
    Missing,

    #[error("CSRF header token does not match cookie token")]
    Mismatch,

    #[error("Failed to build CSRF cookie: {0}")]
    Cookie(#[from] header::InvalidHeaderValue),
}

/// CSRF middleware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Lifetime of the `csrf_token` cookie
    pub token_ttl_secs: u64,
    /// Add the `Secure` attribute to the cookie
    pub secure_cookie: bool,
    pub same_site: SameSite,
    /// Mint a new token after every successful mutating request
    pub rotate_on_success: bool,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3600,
            secure_cookie: true,
            same_site: SameSite::Strict,
            rotate_on_success: true,
        }
    }
}

impl CsrfConfig {
    pub fn production() -> Self {
        Self::default()
    }

    /// Plain-HTTP local development cannot round-trip `Secure` cookies
    pub fn development() -> Self {
        Self {
            secure_cookie: false,
            ..Self::default()
        }
    }

    pub fn with_token_ttl(mut self, token_ttl_secs: u64) -> Self {
        self.token_ttl_secs = token_ttl_secs;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.token_ttl_secs == 0 {
            return Err("CSRF token TTL must be greater than 0".to_string());
        }
        if self.same_site == SameSite::None && !self.secure_cookie {
            return Err("SameSite=None cookies must be Secure".to_string());
        }
        Ok(())
    }
}

/// Issues, checks and rotates CSRF tokens
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    config: CsrfConfig,
    cookie: CookieAttributes,
}

impl CsrfGuard {
    pub fn new(config: CsrfConfig) -> Self {
        let cookie = CookieAttributes {
            http_only: true,
            secure: config.secure_cookie,
            same_site: config.same_site,
            path: "/".to_string(),
        };
        Self { config, cookie }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Compare the header token with the cookie token
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), CsrfError> {
        let supplied = headers
            .get(&CSRF_HEADER_NAME)
            .and_then(|v| v.to_str().ok());
        let stored = get_cookie_value(headers, CSRF_COOKIE_NAME);

        match (supplied, stored.as_deref()) {
            (Some(s), Some(c)) if !s.is_empty() && !c.is_empty() => {
                if tokens_match(Some(s), Some(c)) {
                    Ok(())
                } else {
                    Err(CsrfError::Mismatch)
                }
            }
            _ => Err(CsrfError::Missing),
        }
    }

    /// Mint a token and its `Set-Cookie` header value
    pub fn issue(&self) -> Result<(CsrfToken, HeaderValue), CsrfError> {
        let token = CsrfToken::generate();
        let cookie =
            self.cookie
                .set_cookie(CSRF_COOKIE_NAME, token.as_str(), self.config.token_ttl_secs)?;
        Ok((token, cookie))
    }

    /// Mint a token and attach it to `response` as cookie and header.
    ///
    /// Nothing is written to the response unless both header values built.
    pub fn attach(&self, response: &mut Response) -> Result<CsrfToken, CsrfError> {
        let (token, cookie) = self.issue()?;
        let echoed = HeaderValue::from_str(token.as_str())?;

        let headers = response.headers_mut();
        headers.append(header::SET_COOKIE, cookie);
        headers.insert(CSRF_HEADER_NAME, echoed);
        Ok(token)
    }
}

/// Methods that never change server state
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Check a `csrf_token` field submitted inside form data against the cookie
pub fn validate_form_token(form: &HashMap<String, String>, cookie_token: Option<&str>) -> bool {
    tokens_match(form.get(CSRF_FORM_FIELD).map(String::as_str), cookie_token)
}

/// Middleware guarding mutating requests
pub async fn csrf_protection(
    State(guard): State<Arc<CsrfGuard>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    if is_safe_method(&method) {
        return next.run(request).await;
    }

    if let Err(e) = guard.verify(request.headers()) {
        warn!(
            method = %method,
            path = %request.uri().path(),
            reason = %e,
            "CSRF validation failed"
        );
        return ApiError::from(e).into_response();
    }

    let mut response = next.run(request).await;

    if guard.config.rotate_on_success && response.status().is_success() {
        if let Err(e) = guard.attach(&mut response) {
            return ApiError::from(e).into_response();
        }
        debug!(method = %method, "CSRF token rotated");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(header_token: Option<&str>, cookie: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = header_token {
            headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(token).unwrap());
        }
        if let Some(cookie) = cookie {
            headers.insert(
                header::COOKIE,
                HeaderValue::from_str(&format!("csrf_token={}", cookie)).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn test_verify() {
        let guard = CsrfGuard::new(CsrfConfig::default());

        assert!(guard.verify(&headers_with(Some("abc"), Some("abc"))).is_ok());
        assert!(matches!(
            guard.verify(&headers_with(Some("abc"), Some("abd"))),
            Err(CsrfError::Mismatch)
        ));
        assert!(matches!(
            guard.verify(&headers_with(Some("abc"), None)),
            Err(CsrfError::Missing)
        ));
        assert!(matches!(
            guard.verify(&headers_with(None, Some("abc"))),
            Err(CsrfError::Missing)
        ));
        assert!(matches!(
            guard.verify(&headers_with(Some(""), Some(""))),
            Err(CsrfError::Missing)
        ));
    }

    #[test]
    fn test_issue_sets_cookie_attributes() {
        let guard = CsrfGuard::new(CsrfConfig::production());
        let (token, cookie) = guard.issue().unwrap();
        let cookie = cookie.to_str().unwrap();

        assert_eq!(token.as_str().len(), 32);
        assert!(cookie.starts_with(&format!("csrf_token={};", token.as_str())));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));

        let dev = CsrfGuard::new(CsrfConfig::development().with_token_ttl(600));
        let (_, cookie) = dev.issue().unwrap();
        assert!(!cookie.to_str().unwrap().contains("Secure"));
        assert!(cookie.to_str().unwrap().contains("Max-Age=600"));
    }

    #[test]
    fn test_attach_echoes_token() {
        let guard = CsrfGuard::new(CsrfConfig::default());
        let mut response = Response::new(axum::body::Body::empty());

        let token = guard.attach(&mut response).unwrap();

        assert_eq!(
            response.headers().get(&CSRF_HEADER_NAME).unwrap(),
            token.as_str()
        );
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn test_safe_methods() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::POST));
        assert!(!is_safe_method(&Method::DELETE));
        assert!(!is_safe_method(&Method::PATCH));
    }

    #[test]
    fn test_validate_form_token() {
        let mut form = HashMap::new();
        form.insert("csrf_token".to_string(), "tok".to_string());

        assert!(validate_form_token(&form, Some("tok")));
        assert!(!validate_form_token(&form, Some("other")));
        assert!(!validate_form_token(&form, None));
        assert!(!validate_form_token(&HashMap::new(), Some("tok")));
    }

    #[test]
    fn test_config_validation() {
        assert!(CsrfConfig::default().validate().is_ok());
        assert!(CsrfConfig::default().with_token_ttl(0).validate().is_err());

        let insecure_none = CsrfConfig {
            same_site: SameSite::None,
            secure_cookie: false,
            ..CsrfConfig::default()
        };
        assert!(insecure_none.validate().is_err());
    }
}

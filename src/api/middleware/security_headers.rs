//! Security headers middleware
//!
//! Header values are rendered and parsed once into a [`SecurityHeaderSet`];
//! the per-request work is a handful of `HeaderMap` inserts.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use super::security_config::SecurityHeadersConfig;

/// Immutable, request-independent set of hardening headers
#[derive(Debug, Clone)]
pub struct SecurityHeaderSet {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaderSet {
    /// Render every configured header.
    ///
    /// Fails when a configured value is not a legal header value.
    pub fn from_config(config: &SecurityHeadersConfig) -> Result<Self, String> {
        let mut rendered = vec![
            (
                header::CONTENT_SECURITY_POLICY,
                config.content_security_policy(),
            ),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                config.x_content_type_options.clone(),
            ),
            (header::X_FRAME_OPTIONS, config.x_frame_options.clone()),
            (header::X_XSS_PROTECTION, config.x_xss_protection.clone()),
            (header::REFERRER_POLICY, config.referrer_policy.clone()),
            (
                HeaderName::from_static("permissions-policy"),
                config.permissions_policy.clone(),
            ),
        ];

        if let Some(max_age) = config.hsts_max_age {
            let mut hsts_value = format!("max-age={}", max_age);
            if config.hsts_include_subdomains {
                hsts_value.push_str("; includeSubDomains");
            }
            rendered.push((header::STRICT_TRANSPORT_SECURITY, hsts_value));
        }

        let headers = rendered
            .into_iter()
            .map(|(name, value)| {
                HeaderValue::from_str(&value)
                    .map(|value| (name.clone(), value))
                    .map_err(|_| format!("Invalid value for header {}", name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers })
    }

    /// Overwrite the hardening headers on `target`
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Append the security headers to every response; status and body untouched
pub async fn security_headers_middleware(
    State(header_set): State<Arc<SecurityHeaderSet>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    header_set.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_set() {
        let set = SecurityHeaderSet::from_config(&SecurityHeadersConfig::development()).unwrap();
        let mut headers = HeaderMap::new();
        set.apply(&mut headers);

        assert_eq!(set.len(), 6);
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-xss-protection"], "1; mode=block");
        assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
        assert_eq!(
            headers["permissions-policy"],
            "camera=(), microphone=(), geolocation=()"
        );
        assert!(headers["content-security-policy"]
            .to_str()
            .unwrap()
            .starts_with("default-src 'self'; script-src 'self'"));
        assert!(!headers.contains_key("strict-transport-security"));
    }

    #[test]
    fn test_production_adds_hsts() {
        let set = SecurityHeaderSet::from_config(&SecurityHeadersConfig::production()).unwrap();
        let mut headers = HeaderMap::new();
        set.apply(&mut headers);

        assert_eq!(
            headers["strict-transport-security"],
            "max-age=31536000; includeSubDomains"
        );
    }

    #[test]
    fn test_apply_overwrites_existing_values() {
        let set = SecurityHeaderSet::from_config(&SecurityHeadersConfig::default()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));

        set.apply(&mut headers);

        assert_eq!(headers.get_all(header::X_FRAME_OPTIONS).iter().count(), 1);
        assert_eq!(headers["x-frame-options"], "DENY");
    }

    #[test]
    fn test_invalid_value_is_rejected_at_build_time() {
        let config = SecurityHeadersConfig {
            referrer_policy: "no-referrer\r\n".to_string(),
            ..SecurityHeadersConfig::default()
        };

        assert!(SecurityHeaderSet::from_config(&config).is_err());
    }
}

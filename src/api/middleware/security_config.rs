//! Security headers configuration
//!
//! The Content-Security-Policy is assembled from per-directive source lists
//! so deployments can add origins (for example the auth backend) without
//! rewriting the whole policy string.

use serde::{Deserialize, Serialize};

/// Extra origins allowed per CSP fetch directive, on top of `'self'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CspSources {
    pub script_src: Vec<String>,
    pub style_src: Vec<String>,
    pub img_src: Vec<String>,
    pub font_src: Vec<String>,
    pub connect_src: Vec<String>,
    pub frame_src: Vec<String>,
}

impl Default for CspSources {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            // Payment processor script
            script_src: list(&["'unsafe-inline'", "https://js.stripe.com"]),
            // Font stylesheet CDN
            style_src: list(&["'unsafe-inline'", "https://fonts.googleapis.com"]),
            img_src: list(&["data:", "https:", "blob:"]),
            font_src: list(&["https://fonts.gstatic.com"]),
            // Auth backend and payment API
            connect_src: list(&["https://*.supabase.co", "https://api.dnapayments.com"]),
            frame_src: list(&["https://js.stripe.com"]),
        }
    }
}

/// Security headers configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityHeadersConfig {
    /// Strict Transport Security max age in seconds
    pub hsts_max_age: Option<u64>,
    /// Include subdomains in HSTS
    pub hsts_include_subdomains: bool,
    /// X-Frame-Options value
    pub x_frame_options: String,
    /// X-Content-Type-Options
    pub x_content_type_options: String,
    /// X-XSS-Protection (legacy browsers)
    pub x_xss_protection: String,
    /// Referrer-Policy
    pub referrer_policy: String,
    /// Permissions-Policy (formerly Feature-Policy)
    pub permissions_policy: String,
    /// Content Security Policy sources
    pub csp: CspSources,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age: None,
            hsts_include_subdomains: true,
            x_frame_options: "DENY".to_string(),
            x_content_type_options: "nosniff".to_string(),
            x_xss_protection: "1; mode=block".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            permissions_policy: "camera=(), microphone=(), geolocation=()".to_string(),
            csp: CspSources::default(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Production adds one year of HSTS
    pub fn production() -> Self {
        Self {
            hsts_max_age: Some(31536000),
            ..Self::default()
        }
    }

    /// Development keeps the same policy but never pins browsers to HTTPS
    pub fn development() -> Self {
        Self::default()
    }

    /// Allow `origin` in `connect-src`; duplicates are ignored
    pub fn with_connect_source(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        if !origin.is_empty() && !self.csp.connect_src.contains(&origin) {
            self.csp.connect_src.push(origin);
        }
        self
    }

    /// Render the full Content-Security-Policy value
    pub fn content_security_policy(&self) -> String {
        fn directive(name: &str, sources: &[String]) -> String {
            std::iter::once("'self'")
                .chain(sources.iter().map(String::as_str))
                .fold(name.to_string(), |acc, source| acc + " " + source)
        }

        [
            "default-src 'self'".to_string(),
            directive("script-src", &self.csp.script_src),
            directive("style-src", &self.csp.style_src),
            directive("img-src", &self.csp.img_src),
            directive("font-src", &self.csp.font_src),
            directive("connect-src", &self.csp.connect_src),
            directive("frame-src", &self.csp.frame_src),
            "object-src 'none'".to_string(),
            "base-uri 'self'".to_string(),
            "form-action 'self'".to_string(),
            "frame-ancestors 'none'".to_string(),
            "block-all-mixed-content".to_string(),
            "upgrade-insecure-requests".to_string(),
        ]
        .join("; ")
    }

    /// Validate the security headers configuration
    pub fn validate(&self) -> Result<(), String> {
        let all_sources = [
            &self.csp.script_src,
            &self.csp.style_src,
            &self.csp.img_src,
            &self.csp.font_src,
            &self.csp.connect_src,
            &self.csp.frame_src,
        ];
        for source in all_sources.iter().flat_map(|sources| sources.iter()) {
            if source.is_empty() || source.contains([';', ',', ' ']) {
                return Err(format!("Invalid CSP source: '{}'", source));
            }
        }

        // Validate HSTS max age
        if let Some(max_age) = self.hsts_max_age {
            if max_age == 0 {
                return Err("HSTS max-age must be greater than 0".to_string());
            }
            if max_age > 2147483647 {
                return Err("HSTS max-age is too large (maximum 2147483647)".to_string());
            }
        }

        // Validate X-Frame-Options
        let valid_values = ["DENY", "SAMEORIGIN"];
        if !valid_values.contains(&self.x_frame_options.to_uppercase().as_str()) {
            return Err(format!(
                "Invalid X-Frame-Options value: {}. Valid values are: {}",
                self.x_frame_options,
                valid_values.join(", ")
            ));
        }

        let valid_policies = [
            "no-referrer",
            "no-referrer-when-downgrade",
            "origin",
            "origin-when-cross-origin",
            "same-origin",
            "strict-origin",
            "strict-origin-when-cross-origin",
            "unsafe-url",
        ];
        if !valid_policies.contains(&self.referrer_policy.as_str()) {
            return Err(format!(
                "Invalid Referrer-Policy value: {}",
                self.referrer_policy
            ));
        }

        Ok(())
    }
}

//! Cookie header parsing and `Set-Cookie` construction

use std::fmt;

use axum::http::{header, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => f.write_str("Strict"),
            SameSite::Lax => f.write_str("Lax"),
            SameSite::None => f.write_str("None"),
        }
    }
}

/// Attributes shared by every cookie of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl CookieAttributes {
    /// Render a `Set-Cookie` value for `name=value` living `max_age_secs`
    pub fn set_cookie(
        &self,
        name: &str,
        value: &str,
        max_age_secs: u64,
    ) -> Result<HeaderValue, header::InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; SameSite={}",
            name, value, self.path, max_age_secs, self.same_site
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// A `Set-Cookie` value that makes the browser drop `name`
    pub fn expire(&self, name: &str) -> Result<HeaderValue, header::InvalidHeaderValue> {
        self.set_cookie(name, "", 0)
    }
}

/// Value of cookie `name` across every `Cookie` header of the request
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

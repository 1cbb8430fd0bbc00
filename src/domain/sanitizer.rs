//! Output-safety transformations for untrusted text
//!
//! Everything here is pure: no configuration, no I/O, no errors. Values are
//! escaped so they can be stored, logged, or echoed into HTML without being
//! interpreted as markup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Schemes `sanitize_url` leaves alone, with an optional `//` authority marker
static ALLOWED_SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:https?|mailto|tel):)?(?://)?").expect("Invalid URL scheme regex")
});

/// Escape HTML-significant characters.
///
/// `&` is handled in the same pass as every other character, so entities
/// produced for `<`, `>` and friends are never escaped a second time.
pub fn sanitize_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '`' => escaped.push_str("&#x60;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Absent input sanitizes to an empty string
pub fn sanitize_optional_html(input: Option<&str>) -> String {
    input.map(sanitize_html).unwrap_or_default()
}

/// Force untrusted URLs onto a known scheme.
///
/// Values that start with `http:`, `https:`, `mailto:`, `tel:` (or a bare
/// `//`) are returned untouched. Anything else, including `javascript:`
/// payloads and schemeless domains, is prefixed with `https://`.
pub fn sanitize_url(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let stripped = ALLOWED_SCHEME_PREFIX.replace(input, "");
    if stripped == input {
        format!("https://{}", stripped)
    } else {
        input.to_string()
    }
}

/// Recursively escape every string leaf of a JSON document.
///
/// Object keys, array order and non-string scalars are preserved.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_html(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_json).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, val)| (key.clone(), sanitize_json(val)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

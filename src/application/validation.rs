//! Validate-then-sanitize orchestration shared by every form handler

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::errors::ValidationErrors;
use crate::domain::sanitizer::sanitize_html;
use crate::domain::schema::ValidationSchema;

/// A validated record whose string fields have all been HTML-escaped
pub type SanitizedRecord = Map<String, Value>;

/// Outcome of [`validate_and_sanitize`]: sanitized data or every violation
pub type ValidationResult = Result<SanitizedRecord, ValidationErrors>;

/// Validate `data` against `schema`, then escape every string field of the
/// validated record.
///
/// Sanitization never runs on input that failed validation, so callers
/// either get a fully sanitized record or the complete list of violations.
pub fn validate_and_sanitize(schema: &ValidationSchema, data: &Value) -> ValidationResult {
    let validated = schema.validate(data).map_err(|errors| {
        tracing::debug!(
            schema = schema.name(),
            violations = errors.len(),
            "Input rejected by schema"
        );
        errors
    })?;

    Ok(validated
        .into_iter()
        .map(|(field, value)| match value {
            Value::String(text) => (field, Value::String(sanitize_html(&text))),
            other => (field, other),
        })
        .collect())
}

/// Flatten violations to one message per field path, keeping the first
/// message recorded for each path.
pub fn format_validation_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    let mut formatted = BTreeMap::new();
    for violation in errors {
        formatted
            .entry(violation.path.clone())
            .or_insert_with(|| violation.message.clone());
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{SIGN_IN, SIGN_UP, TICKET_PURCHASE};
    use serde_json::json;

    fn valid_sign_up() -> Value {
        json!({
            "email": "a@b.com",
            "password": "Password123!",
            "confirmPassword": "Password123!",
            "name": "John Doe",
            "phone": "+1234567890",
            "ageVerification": true
        })
    }

    #[test]
    fn test_valid_sign_up_strings_unchanged() {
        let record = validate_and_sanitize(&SIGN_UP, &valid_sign_up()).unwrap();

        assert_eq!(record["email"], "a@b.com");
        assert_eq!(record["name"], "John Doe");
        assert_eq!(record["phone"], "+1234567890");
        assert_eq!(record["ageVerification"], true);
    }

    #[test]
    fn test_markup_in_name_fails_before_sanitization() {
        let mut data = valid_sign_up();
        data["name"] = json!("<b>John</b>");

        let errors = validate_and_sanitize(&SIGN_UP, &data).unwrap_err();
        assert!(errors.has_path("name"));
    }

    #[test]
    fn test_string_fields_are_escaped_after_validation() {
        let data = json!({"email": "user@example.com", "password": "<pass>&'"});
        let record = validate_and_sanitize(&SIGN_IN, &data).unwrap();

        assert_eq!(record["email"], "user@example.com");
        assert_eq!(record["password"], "&lt;pass&gt;&amp;&#x27;");
    }

    #[test]
    fn test_non_string_fields_are_copied() {
        let data = json!({
            "competitionId": "123e4567-e89b-12d3-a456-426614174000",
            "quantity": 100,
            "skillAnswer": "a/b"
        });
        let record = validate_and_sanitize(&TICKET_PURCHASE, &data).unwrap();

        assert_eq!(record["quantity"], 100);
        assert_eq!(record["skillAnswer"], "a&#x2F;b");
    }

    #[test]
    fn test_format_keeps_first_message_per_path() {
        let data = json!({"email": "", "password": "weak"});
        let errors = validate_and_sanitize(&SIGN_IN, &data).unwrap_err();

        let formatted = format_validation_errors(&errors);
        assert_eq!(formatted.len(), 1);
        assert_eq!(formatted["email"], "Email is required");
    }

    #[test]
    fn test_format_uses_dotted_paths() {
        let mut data = valid_sign_up();
        data["confirmPassword"] = json!("Different1!");
        data["ageVerification"] = json!(false);

        let errors = validate_and_sanitize(&SIGN_UP, &data).unwrap_err();
        let formatted = format_validation_errors(&errors);

        assert_eq!(formatted["confirmPassword"], "Passwords do not match");
        assert_eq!(
            formatted["ageVerification"],
            "You must confirm you are 18 years or older"
        );
    }
}

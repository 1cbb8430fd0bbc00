use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::application::validation::SanitizedRecord;

/// Sign-up form fields as posted by the browser
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Checkbox value; only the literal `"true"` counts as confirmed
    pub age_verification: Option<String>,
}

impl SignUpForm {
    /// Record checked by the sign-up schema.
    ///
    /// A missing phone becomes `""` and the age checkbox becomes a boolean.
    pub fn to_record(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
            "confirmPassword": self.confirm_password,
            "name": self.name,
            "phone": self.phone.clone().unwrap_or_default(),
            "ageVerification": self.age_verification.as_deref() == Some("true"),
        })
    }
}

/// Sign-in form fields as posted by the browser
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignInForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignInForm {
    pub fn to_record(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
        })
    }
}

/// Sanitized sign-up data handed to the auth backend
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpCredentials {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub age_verified: bool,
    /// Where the confirmation e-mail link sends the user
    pub email_redirect_to: String,
}

impl SignUpCredentials {
    pub fn from_record(record: &SanitizedRecord, email_redirect_to: String) -> Self {
        Self {
            email: text_field(record, "email"),
            password: text_field(record, "password"),
            name: text_field(record, "name"),
            phone: text_field(record, "phone"),
            age_verified: record
                .get("ageVerification")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            email_redirect_to,
        }
    }

    /// Profile fields stored alongside the account
    pub fn user_metadata(&self) -> Value {
        json!({
            "name": self.name,
            "phone": self.phone,
            "age_verified": self.age_verified,
        })
    }
}

impl fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("age_verified", &self.age_verified)
            .field("email_redirect_to", &self.email_redirect_to)
            .finish()
    }
}

/// Sanitized sign-in data handed to the auth backend
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

impl SignInCredentials {
    pub fn from_record(record: &SanitizedRecord) -> Self {
        Self {
            email: text_field(record, "email"),
            password: text_field(record, "password"),
        }
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Session returned by the auth backend on sign-in
#[derive(Clone)]
pub struct AuthSession {
    pub user: Value,
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Payload of a successful sign-up
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub message: String,
    #[schema(value_type = Object)]
    pub user: Value,
}

/// Payload of a successful sign-in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignInResponse {
    #[schema(value_type = Object)]
    pub user: Value,
}

/// Payload of `GET /api/csrf`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

fn text_field(record: &SanitizedRecord, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

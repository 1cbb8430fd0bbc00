use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::sanitizer::sanitize_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Failed to read middleware config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse middleware config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name,
            reason: reason.into(),
        }
    }
}

/// Deployment environment; production turns on `Secure` cookies and HSTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::invalid(
                "ENVIRONMENT",
                format!("expected development or production, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub environment: Environment,
    /// Base URL of the hosted auth service; `None` selects the in-memory backend
    pub auth_backend_url: Option<String>,
    pub auth_backend_anon_key: String,
    pub auth_backend_timeout_secs: u64,
    /// Public origin of the site, used for e-mail confirmation links
    pub public_base_url: String,
    pub csrf_token_ttl_secs: u64,
    pub max_form_bytes: usize,
    pub log_format: LogFormat,
    /// Optional TOML file overriding the middleware preset
    pub middleware_config_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source.
    ///
    /// Unset or unparsable numbers fall back to defaults. An unknown
    /// `ENVIRONMENT` is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            environment,
            auth_backend_url: lookup("AUTH_BACKEND_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            auth_backend_anon_key: lookup("AUTH_BACKEND_ANON_KEY").unwrap_or_default(),
            auth_backend_timeout_secs: lookup("AUTH_BACKEND_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|s| sanitize_url(s.trim()))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            csrf_token_ttl_secs: lookup("CSRF_TOKEN_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            max_form_bytes: lookup("MAX_FORM_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            middleware_config_path: lookup("MIDDLEWARE_CONFIG")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("LISTEN_ADDR", e.to_string()))?;

        if self.auth_backend_timeout_secs == 0 || self.auth_backend_timeout_secs > 300 {
            return Err(ConfigError::invalid(
                "AUTH_BACKEND_TIMEOUT_SECS",
                "must be between 1 and 300 seconds",
            ));
        }

        if self.csrf_token_ttl_secs < 60 {
            return Err(ConfigError::invalid(
                "CSRF_TOKEN_TTL_SECS",
                "must be at least 60 seconds",
            ));
        }

        if self.max_form_bytes < 1024 {
            return Err(ConfigError::invalid(
                "MAX_FORM_BYTES",
                "must be at least 1024 bytes",
            ));
        }

        match &self.auth_backend_url {
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                return Err(ConfigError::invalid(
                    "AUTH_BACKEND_URL",
                    "must start with http:// or https://",
                ));
            }
            Some(_) if self.auth_backend_anon_key.is_empty() => {
                return Err(ConfigError::invalid(
                    "AUTH_BACKEND_ANON_KEY",
                    "required when AUTH_BACKEND_URL is set",
                ));
            }
            None if self.environment.is_production() => {
                return Err(ConfigError::invalid(
                    "AUTH_BACKEND_URL",
                    "the in-memory auth backend is not allowed in production",
                ));
            }
            _ => {}
        }

        if self.environment.is_production() && !self.public_base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "PUBLIC_BASE_URL",
                "must use https in production",
            ));
        }

        Ok(())
    }
}

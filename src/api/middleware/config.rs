//! Middleware configuration aggregation
//!
//! One structure for every configurable middleware, with environment
//! presets and an optional TOML override file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{csrf::CsrfConfig, security_config::SecurityHeadersConfig};
use crate::config::{ConfigError, Environment};

/// Unified middleware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// CSRF guard configuration
    pub csrf: CsrfConfig,
    /// Security headers configuration
    pub security_headers: SecurityHeadersConfig,
}

impl MiddlewareConfig {
    /// Create a new middleware config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the CSRF guard
    pub fn with_csrf(mut self, config: CsrfConfig) -> Self {
        self.csrf = config;
        self
    }

    /// Configure security headers
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security_headers = config;
        self
    }

    /// Create a production-ready configuration
    pub fn production() -> Self {
        Self {
            csrf: CsrfConfig::production(),
            security_headers: SecurityHeadersConfig::production(),
        }
    }

    /// Create a development configuration with more permissive settings
    pub fn development() -> Self {
        Self {
            csrf: CsrfConfig::development(),
            security_headers: SecurityHeadersConfig::development(),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
    }

    /// Parse a TOML document; omitted keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.csrf
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                name: "csrf",
                reason,
            })?;
        self.security_headers
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                name: "security_headers",
                reason,
            })
    }
}

//! HTTP middleware
//!
//! - [`csrf`]: double-submit token check and rotation for mutating requests
//! - [`security_headers`]: CSP and browser hardening headers on every response
//! - [`error_handling`]: generic body for any 5xx leaving the router
//! - [`request_logging`]: request ID propagation and one log line per request

pub mod config;
pub mod cookies;
pub mod csrf;
pub mod error_handling;
pub mod request_logging;
pub mod security_config;
pub mod security_headers;

pub use config::MiddlewareConfig;
pub use cookies::{get_cookie_value, CookieAttributes, SameSite};
pub use csrf::{csrf_protection, CsrfConfig, CsrfError, CsrfGuard};
pub use error_handling::{create_error_handling_middleware, ErrorHandlingLayer};
pub use request_logging::request_logging_middleware;
pub use security_config::SecurityHeadersConfig;
pub use security_headers::{security_headers_middleware, SecurityHeaderSet};

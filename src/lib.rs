//! # Raffle Gateway - form security layer for a raffle site
//!
//! Validates and sanitizes submitted form data, guards mutating requests
//! with a double-submit CSRF token and hardens every response with a
//! Content-Security-Policy and related headers. Account sign-up, sign-in and
//! sign-out are delegated to an auth backend.
//!
//! ## Architecture Layers
//!
//! - **Domain**: sanitizer, declarative form schemas, CSRF token values
//! - **Application**: validation orchestration, use cases and the auth port
//! - **Infrastructure**: hosted (GoTrue) and in-memory auth backends
//! - **API**: HTTP handlers and middleware
//!
//! ## Example Usage
//!
//! ```no_run
//! use raffle_gateway::{api::create_router, application::builder::ApplicationBuilder, Config};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let state = ApplicationBuilder::new(config).with_auth_backend()?.build()?;
//! let app = create_router(state);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{sanitizer, schema};

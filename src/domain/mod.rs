//! Pure request-guarding logic with no I/O
//!
//! - sanitizer: HTML, URL and JSON sanitization
//! - schema: declarative form schemas and their evaluator
//! - csrf_token: token minting and comparison
//! - errors: validation failure types

pub mod csrf_token;
pub mod errors;
pub mod sanitizer;
pub mod schema;

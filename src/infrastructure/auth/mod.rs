mod http_auth_backend;
mod in_memory_auth_backend;

pub use http_auth_backend::HttpAuthBackend;
pub use in_memory_auth_backend::{InMemoryAuthBackend, DEFAULT_TOKEN_TTL_SECS};

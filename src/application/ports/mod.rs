mod auth_backend;

pub use auth_backend::{AuthBackend, AuthBackendError};

#[cfg(test)]
pub use auth_backend::MockAuthBackend;

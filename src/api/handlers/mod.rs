pub mod auth;
pub mod csrf;
pub mod health;

pub use auth::{
    method_not_allowed_handler, sign_in_handler, sign_out_handler, sign_up_handler,
    ACCESS_TOKEN_COOKIE,
};
pub use csrf::csrf_token_handler;
pub use health::health_handler;

mod sign_in;
mod sign_out;
mod sign_up;

pub use sign_in::SignInUseCase;
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpUseCase, SIGN_UP_MESSAGE};

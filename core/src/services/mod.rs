//! Business services

pub mod auth;
pub mod password;
pub mod token;

pub use auth::{AuthService, RefreshOutcome, RegisterInput, SignInInput, SignInOutcome};
pub use password::PasswordService;
pub use token::TokenCodec;

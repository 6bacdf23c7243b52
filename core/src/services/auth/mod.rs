//! Authentication orchestration

mod service;

#[cfg(test)]
mod tests;

pub use service::{
    AuthService, RefreshOutcome, RegisterInput, RotatedRefresh, SignInInput, SignInOutcome,
};

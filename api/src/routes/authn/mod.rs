//! Account and session endpoints under `/authn`:
//! - CSRF cookie bootstrap
//! - sign-up, sign-in, sign-out
//! - access token verification and refresh
//! - password change
//! - sign-in history listing and revocation

pub mod csrf;
pub mod history;
pub mod refresh;
pub mod signin;
pub mod signout;
pub mod signup;
pub mod update_password;
pub mod verify;

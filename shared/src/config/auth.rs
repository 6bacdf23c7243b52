//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_SECRET: &str = "change-this-secret-before-deploying";

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Symmetric secret for token signing
    pub secret_key: String,

    /// Issuer claim embedded in every token
    pub issuer: String,

    /// Consecutive sign-in failures before the account is locked
    #[serde(default = "default_max_signin_failures")]
    pub max_signin_failures: u32,

    /// Whether sign-in requires a verified email address
    ///
    /// When disabled, registration marks the email verified immediately.
    /// Email delivery itself is an external collaborator.
    #[serde(default)]
    pub require_email_verification: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::from(DEFAULT_SECRET),
            issuer: String::from("ambry"),
            max_signin_failures: default_max_signin_failures(),
            require_email_verification: false,
        }
    }
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| String::from(DEFAULT_SECRET)),
            issuer: env::var("SERVER_NAME").unwrap_or_else(|_| String::from("ambry")),
            max_signin_failures: env::var("MAX_SIGNIN_FAILURES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_signin_failures),
            require_email_verification: env::var("REQUIRE_EMAIL_VERIFICATION")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Check if using the default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET
    }
}

fn default_max_signin_failures() -> u32 {
    5
}

//! DTOs for the `/authn` routes.
//!
//! The `validator` bounds here are transport sanity caps only; the
//! character-class policy with its per-rule error codes runs in the
//! domain layer. A payload rejected here was never a plausible request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(max = 255))]
    pub username: String,
    #[validate(length(max = 255))]
    pub nickname: String,
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 4096))]
    pub password: String,
    #[validate(length(max = 4096))]
    pub password_confirm: String,
}

/// Form-encoded sign-in body. The field is called `username` by
/// convention but accepts `@username` and email identifiers too.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(length(max = 255))]
    pub username: String,
    #[validate(length(max = 4096))]
    pub password: String,
    /// Opaque client-chosen value, stored hashed on the session row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordUpdateRequest {
    #[validate(length(max = 4096))]
    pub current_password: String,
    #[validate(length(max = 4096))]
    pub new_password: String,
    #[validate(length(max = 4096))]
    pub new_password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: String::from("bearer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            email: user.email,
            email_verified: user.email_verified_at.is_some(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub ip: String,
    pub user_agent: String,
    pub signed_in_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether this row backs the presenting token
    pub current: bool,
}

impl SessionResponse {
    pub fn new(session: SignInSession, current_session: Uuid) -> Self {
        Self {
            current: session.id == current_session,
            id: session.id,
            ip: session.ip,
            user_agent: session.user_agent,
            signed_in_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: String::from("ok"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_is_bearer() {
        let response = TokenResponse::bearer("abc".to_string());
        assert_eq!(response.token_type, "bearer");
    }

    #[test]
    fn test_signin_form_client_token_defaults_to_none() {
        let form: SignInForm =
            serde_json::from_value(serde_json::json!({"username": "ada", "password": "pw"}))
                .unwrap();
        assert_eq!(form.username, "ada");
        assert!(form.client_token.is_none());
    }
}

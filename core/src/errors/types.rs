//! Error type definitions for authentication and persistence
//!
//! Each enum is one taxonomy bucket with a fixed HTTP status range and
//! logging policy. Every variant knows its machine-readable code, its
//! status, and how to render itself as a structured response detail.

use ambry_shared::types::response::ErrorDetail;
use ambry_shared::utils::validation::{PasswordIssue, UsernameIssue};
use serde_json::json;
use thiserror::Error;

use crate::domain::entities::user::SignInDisabledReason;

/// Authentication failures (HTTP 401, not logged)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthnError {
    #[error("invalid access token, please refresh your credentials")]
    InvalidAccessToken,

    #[error("your sign-in has expired, please sign in again")]
    InvalidRefreshToken,

    #[error("the signed-in account no longer exists, please sign in again")]
    UserNotFound,

    #[error("sign-in record not found, please sign in again")]
    HistoryNotFound,

    #[error("this action requires signing in")]
    SignInRequired,

    #[error("no account matches that username or email")]
    SignInUserNotFound,

    #[error("wrong password, please try again")]
    WrongPassword,

    #[error("wrong password ({remaining} more failed attempts will lock the account)")]
    WrongPasswordWithWarning { remaining: u32 },

    #[error("{}", .0.message())]
    SignInDisabled(SignInDisabledReason),

    #[error("use sign-out to end the session you are currently using")]
    SelfRevokeNotAllowed,

    #[error("the current password does not match")]
    PasswordChangeWrongPassword,
}

impl AuthnError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthnError::InvalidAccessToken => "INVALID_ACCESS_TOKEN",
            AuthnError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthnError::UserNotFound => "AUTH_USER_NOT_FOUND",
            AuthnError::HistoryNotFound => "AUTH_HISTORY_NOT_FOUND",
            AuthnError::SignInRequired => "SIGNIN_REQUIRED",
            AuthnError::SignInUserNotFound => "SIGNIN_USER_NOT_FOUND",
            AuthnError::WrongPassword => "SIGNIN_WRONG_PASSWORD",
            AuthnError::WrongPasswordWithWarning { .. } => "SIGNIN_WRONG_PASSWORD_WITH_WARNING",
            AuthnError::SignInDisabled(reason) => match reason {
                SignInDisabledReason::EmailNotVerified => "SIGNIN_FAILED_AS_EMAIL_NOT_VERIFIED",
                SignInDisabledReason::SelfDeleted { .. }
                | SignInDisabledReason::AdminDeleted => "ACCOUNT_DISABLED",
                SignInDisabledReason::Locked { .. } => "ACCOUNT_LOCKED",
            },
            AuthnError::SelfRevokeNotAllowed => "SELF_REVOKE_NOT_ALLOWED",
            AuthnError::PasswordChangeWrongPassword => "PASSWORD_CHANGE_WRONG_PASSWORD",
        }
    }

    pub fn loc(&self) -> Vec<String> {
        match self {
            AuthnError::InvalidAccessToken => {
                vec!["header".to_string(), "authorization".to_string()]
            }
            AuthnError::InvalidRefreshToken => {
                vec!["cookie".to_string(), "refresh_token".to_string()]
            }
            AuthnError::SignInUserNotFound => vec!["body".to_string(), "username".to_string()],
            AuthnError::WrongPassword | AuthnError::WrongPasswordWithWarning { .. } => {
                vec!["body".to_string(), "password".to_string()]
            }
            _ => Vec::new(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let mut detail = ErrorDetail::new(self.code(), self.to_string()).with_loc(self.loc());
        if let AuthnError::WrongPasswordWithWarning { remaining } = self {
            detail = detail.with_ctx(json!({ "remaining_attempts": remaining }));
        }
        detail
    }
}

/// Authorization failures (HTTP 403, not logged)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthzError {
    #[error("you do not have permission for this action")]
    PermissionDenied,
}

impl AuthzError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthzError::PermissionDenied => "PERMISSION_DENIED",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.code(), self.to_string())
    }
}

/// Input validation failures (HTTP 422, not logged)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{}", .0.message())]
    Username(UsernameIssue),

    #[error("{}", .0.message())]
    Password(PasswordIssue),

    #[error("that does not look like a valid email address")]
    InvalidEmail,

    #[error("the password confirmation does not match")]
    PasswordConfirmMismatch,

    #[error("the password is too similar to your username, nickname or email")]
    PasswordTooSimilar,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Username(issue) => issue.code(),
            ValidationError::Password(issue) => issue.code(),
            ValidationError::InvalidEmail => "INVALID_EMAIL",
            ValidationError::PasswordConfirmMismatch => "PASSWORD_CONFIRM_MISMATCH",
            ValidationError::PasswordTooSimilar => "PASSWORD_TOO_SIMILAR",
        }
    }

    pub fn loc(&self) -> Vec<String> {
        let field = match self {
            ValidationError::Username(_) => "username",
            ValidationError::Password(_)
            | ValidationError::PasswordConfirmMismatch
            | ValidationError::PasswordTooSimilar => "password",
            ValidationError::InvalidEmail => "email",
        };
        vec!["body".to_string(), field.to_string()]
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.code(), self.to_string()).with_loc(self.loc())
    }
}

/// Miscellaneous client errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("the requested resource was not found")]
    ResourceNotFound,

    #[error("invalid request: {message}")]
    BadRequest { message: String },
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ClientError::BadRequest { .. } => "REQUEST_BODY_INVALID",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::ResourceNotFound => 404,
            ClientError::BadRequest { .. } => 400,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.code(), self.to_string())
    }
}

/// Persistence failures (logged)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("a value is required for `{field}`")]
    NotNull { field: String },

    #[error("`{field}` is already taken, please choose another value")]
    Unique { field: String },

    #[error("the given value cannot be stored: {message}")]
    Data { message: String },

    #[error("stored data failed an integrity check: {message}")]
    Integrity { message: String },

    #[error("could not reach the database: {message}")]
    Connection { message: String },

    #[error("unexpected database error: {message}")]
    Unknown { message: String },
}

impl RepositoryError {
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::NotNull { .. } => "DB_NOT_NULL_CONSTRAINT_ERROR",
            RepositoryError::Unique { .. } => "DB_UNIQUE_CONSTRAINT_ERROR",
            RepositoryError::Data { .. } => "DB_DATA_ERROR",
            RepositoryError::Integrity { .. } => "DB_INTEGRITY_CONSTRAINT_ERROR",
            RepositoryError::Connection { .. } => "DB_CONNECTION_ERROR",
            RepositoryError::Unknown { .. } => "DB_UNKNOWN_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RepositoryError::NotNull { .. }
            | RepositoryError::Unique { .. }
            | RepositoryError::Data { .. } => 422,
            RepositoryError::Integrity { .. }
            | RepositoryError::Connection { .. }
            | RepositoryError::Unknown { .. } => 500,
        }
    }

    pub fn loc(&self) -> Vec<String> {
        match self {
            RepositoryError::NotNull { field } | RepositoryError::Unique { field } => {
                vec!["body".to_string(), field.clone()]
            }
            _ => Vec::new(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.code(), self.to_string()).with_loc(self.loc())
    }
}

/// Internal failures outside the database (HTTP 500, logged)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServerError {
    #[error("something went wrong, please try again in a few minutes")]
    Internal { message: String },
}

impl ServerError {
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Internal { .. } => "UNKNOWN_SERVER_ERROR",
        }
    }

    /// The operator-facing message, kept out of the client response
    pub fn internal_message(&self) -> &str {
        match self {
            ServerError::Internal { message } => message,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.code(), self.to_string())
    }
}

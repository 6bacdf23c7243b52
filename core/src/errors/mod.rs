//! Domain-specific error types and error handling.
//!
//! Leaf error enums live in [`types`]; [`DomainError`] bridges them into
//! one type that flows through every service and repository. Multiple
//! failures from one request (validation, not-null checks) are carried
//! together and the aggregated HTTP status is the maximum of the parts.

mod types;

pub use types::{
    AuthnError, AuthzError, ClientError, RepositoryError, ServerError, ValidationError,
};

use ambry_shared::types::response::ErrorDetail;
use ambry_shared::utils::validation::{PasswordIssue, UsernameIssue};
use thiserror::Error;

/// Core domain error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Authn(#[from] AuthnError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("{} errors occurred", .0.len())]
    Multiple(Vec<DomainError>),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Wrap a batch of errors, unwrapping a singleton batch
    pub fn multiple(mut errors: Vec<DomainError>) -> DomainError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            DomainError::Multiple(errors)
        }
    }

    pub fn internal(message: impl Into<String>) -> DomainError {
        DomainError::Server(ServerError::Internal {
            message: message.into(),
        })
    }

    /// Flatten a batch into its parts; a leaf error becomes a
    /// one-element vector
    pub fn into_vec(self) -> Vec<DomainError> {
        match self {
            DomainError::Multiple(errors) => errors,
            other => vec![other],
        }
    }

    /// HTTP status this error maps to; the maximum wins for a batch
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Authn(_) => 401,
            DomainError::Authz(_) => 403,
            DomainError::Validation(_) => 422,
            DomainError::Client(e) => e.status_code(),
            DomainError::Repository(e) => e.status_code(),
            DomainError::Server(_) => 500,
            DomainError::Multiple(errors) => errors
                .iter()
                .map(DomainError::status_code)
                .max()
                .unwrap_or(500),
        }
    }

    /// Whether this error warrants an operator-facing log line
    pub fn loggable(&self) -> bool {
        match self {
            DomainError::Authn(_) | DomainError::Authz(_) => false,
            DomainError::Validation(_) | DomainError::Client(_) => false,
            DomainError::Repository(_) | DomainError::Server(_) => true,
            DomainError::Multiple(errors) => errors.iter().any(DomainError::loggable),
        }
    }

    /// Flatten into structured response details
    pub fn details(&self) -> Vec<ErrorDetail> {
        match self {
            DomainError::Authn(e) => vec![e.detail()],
            DomainError::Authz(e) => vec![e.detail()],
            DomainError::Validation(e) => vec![e.detail()],
            DomainError::Client(e) => vec![e.detail()],
            DomainError::Repository(e) => vec![e.detail()],
            DomainError::Server(e) => vec![e.detail()],
            DomainError::Multiple(errors) => {
                errors.iter().flat_map(DomainError::details).collect()
            }
        }
    }

    /// Collect username rule violations into one error
    pub fn from_username_issues(issues: Vec<UsernameIssue>) -> DomainError {
        DomainError::multiple(
            issues
                .into_iter()
                .map(|i| DomainError::Validation(ValidationError::Username(i)))
                .collect(),
        )
    }

    /// Collect password rule violations into one error
    pub fn from_password_issues(issues: Vec<PasswordIssue>) -> DomainError {
        DomainError::multiple(
            issues
                .into_iter()
                .map(|i| DomainError::Validation(ValidationError::Password(i)))
                .collect(),
        )
    }
}

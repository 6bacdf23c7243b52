//! Domain error to HTTP response mapping.
//!
//! Every handler returns [`ApiResult`]; actix renders the error arm
//! through [`ResponseError`]. The body is always the structured
//! `{"detail": [...]}` shape, the status is the maximum across an
//! aggregated batch, and only repository and server errors produce an
//! operator-facing log line.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use ambry_core::errors::DomainError;
use ambry_shared::types::ErrorBody;

/// A [`DomainError`] crossing the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.0.loggable() {
            error!(error = ?self.0, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.0.details()))
    }
}

//! Request and response DTOs

pub mod auth_dto;

pub use auth_dto::{
    MessageResponse, PasswordUpdateRequest, SessionResponse, SignInForm, SignUpRequest,
    TokenResponse, UserResponse,
};

use validator::Validate;

use ambry_core::errors::{ClientError, DomainError};

use crate::handlers::{ApiError, ApiResult};

/// Transport-level shape gate, run before the domain policy
pub fn vet<T: Validate>(body: &T) -> ApiResult<()> {
    body.validate().map_err(|e| {
        ApiError::from(DomainError::Client(ClientError::BadRequest {
            message: e.to_string(),
        }))
    })
}

//! Request credential extraction helpers.
//!
//! Handlers call these instead of poking at headers themselves so the
//! failure modes stay uniform: a missing or malformed bearer token
//! reads exactly like an invalid one.

use actix_web::http::header;
use actix_web::HttpRequest;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::token::Claims;
use ambry_core::domain::entities::user::User;
use ambry_core::errors::{AuthnError, DomainError};
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::cookies::{CSRF_COOKIE, REFRESH_COOKIE};
use crate::handlers::{ApiError, ApiResult};
use crate::state::AppState;

/// The bearer token from the `Authorization` header
pub fn bearer_token(req: &HttpRequest) -> ApiResult<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::from(DomainError::Authn(AuthnError::InvalidAccessToken)))
}

/// The CSRF cookie value, when the client holds one
pub fn csrf_token(req: &HttpRequest) -> Option<String> {
    req.cookie(CSRF_COOKIE).map(|c| c.value().to_string())
}

/// The refresh cookie value, when the client holds one
pub fn refresh_token(req: &HttpRequest) -> Option<String> {
    req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string())
}

/// The raw `User-Agent` header, empty when absent
pub fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Peer address, honoring proxy headers when actix trusts them
pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Authenticate the request through its bearer token.
///
/// An absent CSRF cookie degrades to an empty signing-key suffix, so
/// the signature check fails and the caller sees the same invalid
/// access token error as for any other tampering.
pub async fn authenticate<US, SS, RC>(
    state: &AppState<US, SS, RC>,
    req: &HttpRequest,
) -> ApiResult<Claims>
where
    US: EntityStore<User>,
    SS: EntityStore<SignInSession>,
    RC: RevocationCache,
{
    let token = bearer_token(req)?;
    let csrf = csrf_token(req).unwrap_or_default();
    let claims = state
        .auth
        .verify_access(&token, &csrf, &user_agent(req))
        .await?;
    Ok(claims)
}

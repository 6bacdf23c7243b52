//! Handler for `GET /authn/refresh/`

use actix_web::{web, HttpRequest, HttpResponse};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::errors::{AuthnError, DomainError};
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::cookies;
use crate::dto::TokenResponse;
use crate::extract::{csrf_token, refresh_token, user_agent};
use crate::handlers::{ApiError, ApiResult};
use crate::state::AppState;

/// Trade the refresh cookie for a fresh access token.
///
/// Without a CSRF cookie there is no key to sign the access token
/// with, so the client has to go through sign-in again. The refresh
/// cookie is only re-issued when the sliding window rotated the token.
pub async fn refresh<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let csrf = csrf_token(&req)
        .ok_or_else(|| ApiError::from(DomainError::Authn(AuthnError::SignInRequired)))?;
    let token = refresh_token(&req)
        .ok_or_else(|| ApiError::from(DomainError::Authn(AuthnError::InvalidRefreshToken)))?;

    let outcome = state.auth.refresh(&token, &csrf, &user_agent(&req)).await?;

    let mut response = HttpResponse::Ok();
    if let Some(rotated) = outcome.rotated {
        response.cookie(cookies::refresh_cookie(
            &rotated.token,
            rotated.expires_at,
            state.config.secure_cookies(),
        ));
    }
    Ok(response.json(TokenResponse::bearer(outcome.access_token)))
}

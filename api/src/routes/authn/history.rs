//! Handlers for `/authn/history`

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::dto::SessionResponse;
use crate::extract::authenticate;
use crate::handlers::ApiResult;
use crate::state::AppState;

/// `GET /authn/history/` — the bearer's active sessions, oldest
/// sign-in first. The presenting session is flagged `current`.
pub async fn list<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let claims = authenticate(&state, &req).await?;
    let sessions = state.auth.list_sessions(&claims).await?;
    let body: Vec<SessionResponse> = sessions
        .into_iter()
        .map(|session| SessionResponse::new(session, claims.jti))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// `DELETE /authn/history/{id}` — revoke another of the bearer's
/// sessions. The presenting session must go through sign-out; other
/// users' sessions read as not found. Responds 204.
pub async fn revoke<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let claims = authenticate(&state, &req).await?;
    state.auth.revoke_session(&claims, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

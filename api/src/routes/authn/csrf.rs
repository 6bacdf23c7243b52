//! Handler for `HEAD /authn/csrf/`

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::cookies;
use crate::extract::csrf_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CsrfQuery {
    /// Re-issue even when the client already holds a cookie
    #[serde(default)]
    pub force: bool,
}

/// Make sure the caller holds a CSRF cookie.
///
/// Frontends call this once before the sign-in form renders; the
/// cookie value becomes part of the access-token signing key. Always
/// responds 204.
pub async fn issue<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
    query: web::Query<CsrfQuery>,
) -> HttpResponse
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    if !query.force && csrf_token(&req).is_some() {
        return HttpResponse::NoContent().finish();
    }
    let cookie = cookies::csrf_cookie(
        &Uuid::new_v4().to_string(),
        state.config.secure_cookies(),
    );
    HttpResponse::NoContent().cookie(cookie).finish()
}

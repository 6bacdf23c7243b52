//! Handler for `DELETE /authn/signout/`

use actix_web::{web, HttpRequest, HttpResponse};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::cookies;
use crate::extract::authenticate;
use crate::handlers::ApiResult;
use crate::state::AppState;

/// End the presenting session.
///
/// Revokes the session row, writes the revocation marker so both
/// outstanding tokens die immediately, and expires both cookies.
/// Responds 204.
pub async fn signout<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let claims = authenticate(&state, &req).await?;
    state.auth.sign_out(&claims).await?;

    let secure = state.config.secure_cookies();
    Ok(HttpResponse::NoContent()
        .cookie(cookies::clear_refresh_cookie(secure))
        .cookie(cookies::clear_csrf_cookie(secure))
        .finish())
}

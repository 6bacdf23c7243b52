//! Handler for `PUT /authn/verify/`

use actix_web::{web, HttpRequest, HttpResponse};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::dto::MessageResponse;
use crate::extract::authenticate;
use crate::handlers::ApiResult;
use crate::state::AppState;

/// Check the presented access token.
///
/// Frontends call this on page load to decide between restoring the
/// session and sending the user to the sign-in form. `{"message":
/// "ok"}` when the token holds up, 401 otherwise.
pub async fn verify<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    authenticate(&state, &req).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok()))
}

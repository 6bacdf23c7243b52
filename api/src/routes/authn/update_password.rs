//! Handler for `POST /authn/update-password/`

use actix_web::{web, HttpRequest, HttpResponse};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::dto::{vet, PasswordUpdateRequest, UserResponse};
use crate::extract::authenticate;
use crate::handlers::ApiResult;
use crate::state::AppState;

/// Change the bearer's password.
///
/// Requires the current password; the new one goes through the full
/// policy including the similarity check against the bearer's own
/// identifiers. A too-many-failures lock is lifted as a side effect.
pub async fn update_password<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
    body: web::Json<PasswordUpdateRequest>,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let claims = authenticate(&state, &req).await?;
    let body = body.into_inner();
    vet(&body)?;

    let user = state
        .auth
        .change_password(
            &claims,
            &body.current_password,
            &body.new_password,
            &body.new_password_confirm,
        )
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

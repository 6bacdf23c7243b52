//! Handler for `POST /authn/signup/`

use actix_web::{web, HttpResponse};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;
use ambry_core::services::RegisterInput;

use crate::dto::{vet, SignUpRequest, UserResponse};
use crate::handlers::ApiResult;
use crate::state::AppState;

/// Create an account.
///
/// Every violated rule is reported in one 422 response, so the form
/// can mark all offending fields at once. Responds 201 with the user
/// DTO on success.
pub async fn signup<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    body: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let body = body.into_inner();
    vet(&body)?;

    let user = state
        .auth
        .register(RegisterInput {
            username: body.username,
            nickname: body.nickname,
            email: body.email,
            password: body.password,
            password_confirm: body.password_confirm,
        })
        .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

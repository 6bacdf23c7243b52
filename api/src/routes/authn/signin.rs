//! Handler for `POST /authn/signin/`

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;
use ambry_core::services::SignInInput;

use crate::cookies;
use crate::dto::{vet, SignInForm, TokenResponse};
use crate::extract::{client_ip, csrf_token, user_agent};
use crate::handlers::ApiResult;
use crate::state::AppState;

/// Sign in with a form-encoded username and password.
///
/// The `username` field also accepts `@username` and email addresses.
/// On success the refresh token lands in an HttpOnly cookie scoped to
/// `/authn/` and the body carries the access token, 201. A client that
/// skipped the CSRF bootstrap gets its cookie minted here.
pub async fn signin<US, SS, RC>(
    state: web::Data<AppState<US, SS, RC>>,
    req: HttpRequest,
    form: web::Form<SignInForm>,
) -> ApiResult<HttpResponse>
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    let form = form.into_inner();
    vet(&form)?;

    let secure = state.config.secure_cookies();
    let (csrf, minted_csrf_cookie) = match csrf_token(&req) {
        Some(value) => (value, None),
        None => {
            let value = Uuid::new_v4().to_string();
            let cookie = cookies::csrf_cookie(&value, secure);
            (value, Some(cookie))
        }
    };

    let outcome = state
        .auth
        .sign_in(
            SignInInput {
                identifier: form.username,
                password: form.password,
                ip: client_ip(&req),
                user_agent: user_agent(&req),
                client_token: form.client_token,
            },
            &csrf,
        )
        .await?;

    let mut response = HttpResponse::Created();
    if let Some(cookie) = minted_csrf_cookie {
        response.cookie(cookie);
    }
    response.cookie(cookies::refresh_cookie(
        &outcome.refresh_token,
        outcome.session.expires_at,
        secure,
    ));
    Ok(response.json(TokenResponse::bearer(outcome.access_token)))
}

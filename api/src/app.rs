//! Route table and extractor configuration.
//!
//! `configure` is generic over the persistence backends; `main`
//! instantiates it with the MySQL and Redis implementations, the
//! integration tests with memory-backed ones.

use actix_web::error::{JsonPayloadError, PathError, UrlencodedError};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::errors::{ClientError, DomainError};
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;

use crate::handlers::ApiError;
use crate::routes::authn;

/// Register every route and the extractor error hooks.
///
/// Malformed JSON, forms and path segments all come back in the same
/// `{"detail": [...]}` shape as domain errors.
pub fn configure<US, SS, RC>(cfg: &mut web::ServiceConfig)
where
    US: EntityStore<User> + 'static,
    SS: EntityStore<SignInSession> + 'static,
    RC: RevocationCache + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::FormConfig::default().error_handler(form_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/authn")
                .route("/csrf/", web::head().to(authn::csrf::issue::<US, SS, RC>))
                .route("/signup/", web::post().to(authn::signup::signup::<US, SS, RC>))
                .route("/signin/", web::post().to(authn::signin::signin::<US, SS, RC>))
                .route(
                    "/signout/",
                    web::delete().to(authn::signout::signout::<US, SS, RC>),
                )
                .route("/verify/", web::put().to(authn::verify::verify::<US, SS, RC>))
                .route(
                    "/refresh/",
                    web::get().to(authn::refresh::refresh::<US, SS, RC>),
                )
                .route(
                    "/update-password/",
                    web::post().to(authn::update_password::update_password::<US, SS, RC>),
                )
                .service(
                    web::scope("/history")
                        .route("/", web::get().to(authn::history::list::<US, SS, RC>))
                        .route(
                            "/{id}",
                            web::delete().to(authn::history::revoke::<US, SS, RC>),
                        ),
                ),
        )
        .default_service(web::route().to(not_found));
}

/// Liveness probe
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ambry-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    ApiError::from(DomainError::Client(ClientError::ResourceNotFound)).error_response()
}

fn bad_request(message: String) -> actix_web::Error {
    ApiError::from(DomainError::Client(ClientError::BadRequest { message })).into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(err.to_string())
}

fn form_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(err.to_string())
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(err.to_string())
}

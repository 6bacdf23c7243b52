//! Environment-aware CORS configuration.
//!
//! Debug deployments accept any origin so local frontends can talk to
//! the API without ceremony. Everywhere else the allow-list comes from
//! `CORS_ALLOWED_ORIGINS`, and credentials stay enabled because both
//! auth cookies ride on cross-origin requests.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use ambry_shared::config::AppConfig;

pub fn create_cors(config: &AppConfig) -> Cors {
    if config.environment.is_debug() {
        info!("CORS: permissive (debug deployment)");
        return Cors::permissive();
    }

    info!(
        origins = ?config.server.allowed_origins,
        "CORS: restricted to configured origins"
    );
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
        ])
        .supports_credentials()
        .max_age(3600);
    for origin in &config.server.allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

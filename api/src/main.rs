use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use ambry_api::{app, middleware, state::AppState};
use ambry_core::services::AuthService;
use ambry_infra::cache::{RedisClient, RedisRevocationCache};
use ambry_infra::database::{DatabasePool, MySqlSessionStore, MySqlUserStore};
use ambry_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(environment = ?config.environment, "starting Ambry API server");
    if config.auth.is_using_default_secret() {
        warn!("SECRET_KEY is not set; every token signed with the development default is forgeable");
    }

    let pool = DatabasePool::new(&config.database).await?;
    pool.health_check().await?;

    let redis = RedisClient::new(&config.cache).await?;

    let users = Arc::new(MySqlUserStore::new(pool.pool().clone()));
    let sessions = Arc::new(MySqlSessionStore::new(pool.pool().clone()));
    let revocation = Arc::new(RedisRevocationCache::new(redis));

    let auth = AuthService::new(users, sessions, revocation, &config.auth);
    let state = web::Data::new(AppState::new(auth, config.clone()));

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    info!(address = %bind_address, "listening");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::cors::create_cors(&config))
            .configure(app::configure::<MySqlUserStore, MySqlSessionStore, RedisRevocationCache>)
    });
    if workers > 0 {
        server = server.workers(workers);
    }
    server.bind(&bind_address)?.run().await?;

    pool.close().await;
    Ok(())
}

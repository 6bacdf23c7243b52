//! # Infrastructure Layer
//!
//! Concrete persistence and caching backends for the Ambry backend:
//! MySQL entity stores via SQLx and the Redis revocation cache.

pub mod cache;
pub mod database;

use thiserror::Error;

/// Errors raised while standing up or talking to external services
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),
}

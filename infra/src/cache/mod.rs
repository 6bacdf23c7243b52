//! Redis caching layer

pub mod redis_client;
pub mod revocation;

pub use redis_client::RedisClient;
pub use revocation::RedisRevocationCache;

//! Cache (Redis) configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Default TTL for cache entries in seconds
    #[serde(default = "default_ttl")]
    pub default_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://127.0.0.1:6379"),
            pool_size: default_pool_size(),
            default_ttl: default_ttl(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("REDIS_URL") {
            config.url = url;
        }
        config
    }
}

fn default_pool_size() -> u32 {
    10
}

fn default_ttl() -> u64 {
    3600
}

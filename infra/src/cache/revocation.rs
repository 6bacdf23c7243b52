//! Redis-backed token revocation cache
//!
//! One key per revoked session: `token_revoked:{session_id}` with a
//! sentinel value and a TTL of one refresh-validity window. After the
//! TTL the tokens have expired by themselves and the marker is moot.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use ambry_core::errors::{DomainError, DomainResult};
use ambry_core::repositories::revocation::RevocationCache;

use super::redis_client::RedisClient;

const KEY_PREFIX: &str = "token_revoked:";
const SENTINEL: &str = "1";

/// Revocation markers stored in Redis
#[derive(Clone)]
pub struct RedisRevocationCache {
    client: RedisClient,
}

impl RedisRevocationCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(session_id: Uuid) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }
}

#[async_trait]
impl RevocationCache for RedisRevocationCache {
    async fn mark_revoked(&self, session_id: Uuid, ttl: Duration) -> DomainResult<()> {
        self.client
            .set_with_expiry(&Self::key(session_id), SENTINEL, ttl.as_secs().max(1))
            .await
            .map_err(|e| DomainError::internal(format!("revocation marker write failed: {e}")))
    }

    async fn is_revoked(&self, session_id: Uuid) -> DomainResult<bool> {
        self.client
            .get(&Self::key(session_id))
            .await
            .map(|value| value.is_some())
            .map_err(|e| DomainError::internal(format!("revocation marker read failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            RedisRevocationCache::key(id),
            "token_revoked:00000000-0000-0000-0000-000000000000"
        );
    }
}

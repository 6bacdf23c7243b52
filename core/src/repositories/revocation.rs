//! Token revocation marker interface
//!
//! Revocation is keyed by session id (`jti`): one marker invalidates
//! the refresh token and every access token minted under it. Markers
//! carry a TTL of one full refresh-validity window, after which the
//! tokens have expired on their own.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::DomainResult;

/// Fast-path lookup consulted on every token verification
#[async_trait]
pub trait RevocationCache: Send + Sync {
    /// Write a revocation marker for the session
    async fn mark_revoked(&self, session_id: Uuid, ttl: Duration) -> DomainResult<()>;

    /// Whether the session has a live revocation marker
    async fn is_revoked(&self, session_id: Uuid) -> DomainResult<bool>;
}

/// In-memory revocation cache for tests
pub struct MockRevocationCache {
    markers: Arc<RwLock<HashMap<Uuid, Instant>>>,
}

impl MockRevocationCache {
    pub fn new() -> Self {
        Self {
            markers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockRevocationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationCache for MockRevocationCache {
    async fn mark_revoked(&self, session_id: Uuid, ttl: Duration) -> DomainResult<()> {
        let mut markers = self.markers.write().await;
        markers.insert(session_id, Instant::now() + ttl);
        Ok(())
    }

    async fn is_revoked(&self, session_id: Uuid) -> DomainResult<bool> {
        let markers = self.markers.read().await;
        Ok(markers
            .get(&session_id)
            .map(|expiry| *expiry > Instant::now())
            .unwrap_or(false))
    }
}

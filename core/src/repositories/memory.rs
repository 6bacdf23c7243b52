//! In-memory entity store for tests and local development

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{DomainError, DomainResult, RepositoryError};

use super::entity::{Entity, EntityStore};

/// Store backed by a `Vec` guarded by an async lock.
///
/// Rows keep insertion order, which stands in for the `created_at`
/// ordering of the SQL stores.
pub struct MemoryStore<E: Entity> {
    items: Arc<RwLock<Vec<E>>>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of rows, soft-deleted included
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn insert(&self, entity: E) -> DomainResult<E> {
        let mut items = self.items.write().await;
        for existing in items.iter() {
            if let Some(field) = entity.conflicts_with(existing) {
                return Err(DomainError::Repository(RepositoryError::Unique {
                    field: field.to_string(),
                }));
            }
        }
        items.push(entity.clone());
        Ok(entity)
    }

    async fn fetch(&self, id: &E::Id) -> DomainResult<Option<E>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|e| e.id() == *id).cloned())
    }

    async fn fetch_first(&self, filter: &E::Filter) -> DomainResult<Option<E>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|e| e.matches(filter)).cloned())
    }

    async fn fetch_many(
        &self,
        filter: &E::Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<E>> {
        let items = self.items.read().await;
        let matched = items
            .iter()
            .filter(|e| e.matches(filter))
            .skip(skip as usize);
        Ok(match limit {
            Some(n) => matched.take(n as usize).cloned().collect(),
            None => matched.cloned().collect(),
        })
    }

    async fn persist(&self, entity: E) -> DomainResult<E> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(DomainError::Repository(RepositoryError::Unknown {
                message: format!("no row with id {} to persist", entity.id()),
            })),
        }
    }

    async fn remove(&self, id: &E::Id) -> DomainResult<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|e| e.id() != *id);
        Ok(items.len() < before)
    }
}

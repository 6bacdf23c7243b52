//! Generic CRUD repository layered over any [`EntityStore`]

use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::{ClientError, DomainError, DomainResult, RepositoryError};

use super::entity::{CreateSchema, Entity, EntityStore, UpdateSchema};

/// Shared create/read/update/delete semantics for one aggregate.
///
/// The repository owns no state beyond a handle to its store; cloning
/// is cheap and every operation commits before returning.
pub struct CrudRepository<E: Entity, S: EntityStore<E>> {
    store: Arc<S>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: EntityStore<E>> Clone for CrudRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, S: EntityStore<E>> CrudRepository<E, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch by id; missing and soft-deleted rows are both not-found
    pub async fn get(&self, id: &E::Id) -> DomainResult<E> {
        match self.store.fetch(id).await? {
            Some(entity) if entity.deleted_at().is_none() => Ok(entity),
            _ => Err(DomainError::Client(ClientError::ResourceNotFound)),
        }
    }

    /// Fetch by id even when soft-deleted
    pub async fn get_any(&self, id: &E::Id) -> DomainResult<Option<E>> {
        self.store.fetch(id).await
    }

    /// First entity matching the filter
    pub async fn get_by(&self, filter: &E::Filter) -> DomainResult<Option<E>> {
        self.store.fetch_first(filter).await
    }

    /// List entities matching the filter
    pub async fn list(
        &self,
        filter: &E::Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<E>> {
        self.store.fetch_many(filter, skip, limit).await
    }

    /// Create a new entity.
    ///
    /// Required fields missing a value are reported together, one
    /// not-null constraint error per field.
    pub async fn create<C: CreateSchema<E>>(&self, schema: C) -> DomainResult<E> {
        let entity = schema.into_entity();
        let missing = entity.null_required_fields();
        if !missing.is_empty() {
            return Err(DomainError::multiple(
                missing
                    .into_iter()
                    .map(|field| {
                        DomainError::Repository(RepositoryError::NotNull {
                            field: field.to_string(),
                        })
                    })
                    .collect(),
            ));
        }
        self.store.insert(entity).await
    }

    /// Fetch the entity identified by the schema's primary filter,
    /// creating it when absent. The flag reports whether a row was
    /// created.
    pub async fn get_or_create<C: CreateSchema<E>>(&self, schema: C) -> DomainResult<(E, bool)> {
        if let Some(existing) = self.store.fetch_first(&schema.primary_filter()).await? {
            return Ok((existing, false));
        }
        let created = self.create(schema).await?;
        Ok((created, true))
    }

    /// Apply a partial update and write it back
    pub async fn update<U: UpdateSchema<E>>(&self, id: &E::Id, patch: &U) -> DomainResult<E> {
        let mut entity = self.get(id).await?;
        patch.apply_to(&mut entity);
        self.store.persist(entity).await
    }

    /// Soft-delete: stamp `deleted_at` with the store's clock and keep
    /// the row
    pub async fn soft_delete(&self, id: &E::Id) -> DomainResult<E> {
        let mut entity = self.get(id).await?;
        let now = self.store.current_timestamp().await?;
        entity.set_deleted_at(Some(now));
        self.store.persist(entity).await
    }

    /// Physical delete, for maintenance paths only
    pub async fn hard_delete(&self, id: &E::Id) -> DomainResult<bool> {
        self.store.remove(id).await
    }
}

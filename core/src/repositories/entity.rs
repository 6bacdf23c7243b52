//! Persistence traits shared by every stored aggregate

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::hash::Hash;

use crate::errors::DomainResult;

/// A persistable aggregate root.
///
/// Every entity carries an id and a soft-deletion timestamp; queries
/// exclude soft-deleted rows unless a filter opts in.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + PartialEq + Eq + Hash + Display + Send + Sync;

    /// Backend-agnostic query shape. `Default` must produce the
    /// match-everything (not deleted) filter.
    type Filter: Clone + Default + Send + Sync;

    fn id(&self) -> Self::Id;

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    /// Whether this entity satisfies the filter. In-memory stores use
    /// this directly; SQL stores translate the filter to a WHERE clause
    /// with the same meaning.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Required fields that are missing a value, checked before insert
    fn null_required_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// The unique field this entity collides with `other` on, if any
    fn conflicts_with(&self, _other: &Self) -> Option<&'static str> {
        None
    }
}

/// Input shape for creating an entity
pub trait CreateSchema<E: Entity>: Send {
    fn into_entity(self) -> E;

    /// Filter identifying an already-existing equivalent, used by
    /// get-or-create
    fn primary_filter(&self) -> E::Filter;
}

/// Input shape for partially updating an entity
pub trait UpdateSchema<E: Entity>: Send + Sync {
    fn apply_to(&self, entity: &mut E);
}

/// Narrow persistence seam implemented per backend.
///
/// Every mutating call commits before returning; callers always see a
/// post-commit snapshot.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Insert a new row, enforcing unique constraints
    async fn insert(&self, entity: E) -> DomainResult<E>;

    /// Fetch by id, soft-deleted rows included
    async fn fetch(&self, id: &E::Id) -> DomainResult<Option<E>>;

    /// First row matching the filter
    async fn fetch_first(&self, filter: &E::Filter) -> DomainResult<Option<E>>;

    /// All rows matching the filter, paginated
    async fn fetch_many(
        &self,
        filter: &E::Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<E>>;

    /// Write back a modified entity
    async fn persist(&self, entity: E) -> DomainResult<E>;

    /// Physically delete a row; returns whether one existed
    async fn remove(&self, id: &E::Id) -> DomainResult<bool>;

    /// The store's clock. SQL backends answer with the database
    /// server's time so deletion stamps do not drift across
    /// application hosts.
    async fn current_timestamp(&self) -> DomainResult<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

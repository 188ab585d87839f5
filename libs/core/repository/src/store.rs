//! Persistence contract the generic repository runs on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::RepositoryResult;
use crate::query::{Filter, Sort};

/// Partial update applied through [`EntityStore::update_by_id`].
///
/// Every variant refreshes `updated_at` at the store layer.
#[derive(Debug, Clone)]
pub enum Patch<U> {
    /// Merge the serialized fields of the update over the stored document.
    Fields(U),
    /// Mark the record soft-deleted at the given instant.
    SoftDelete { deleted_at: DateTime<Utc> },
    /// Clear the soft-delete flag and the deletion timestamp.
    Restore,
}

/// Storage adapter executing typed queries for one entity type.
///
/// Implementations translate [`Filter`] and [`Sort`] into their native
/// query language; callers never see raw documents.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Persist a new record built via [`Entity::new_record`] and return it
    /// in full. Unique-field violations surface as
    /// [`crate::RepositoryError::DuplicateKey`].
    async fn insert(&self, input: T::Create) -> RepositoryResult<T>;

    /// At most one record matching `filter`.
    async fn find_one(&self, filter: &Filter) -> RepositoryResult<Option<T>>;

    /// The batch matching `filter`, ordered by `sort`, windowed by
    /// `skip` and `limit`.
    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: u64,
        limit: u64,
    ) -> RepositoryResult<Vec<T>>;

    /// Total matches for `filter`, ignoring any window.
    async fn count(&self, filter: &Filter) -> RepositoryResult<u64>;

    /// Apply `patch` to the record with `id`, provided it also matches
    /// `guard`. Returns the post-update record, or `None` when no record
    /// satisfied both conditions.
    async fn update_by_id(
        &self,
        id: Uuid,
        guard: &Filter,
        patch: Patch<T::Update>,
    ) -> RepositoryResult<Option<T>>;

    /// Hard delete. Removing an absent record is not an error.
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()>;
}

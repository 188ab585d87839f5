//! Soft-delete visibility policy and offset pagination over any
//! [`EntityStore`].

use std::marker::PhantomData;

use tracing::instrument;
use uuid::Uuid;

use crate::entity::{fields, Entity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::page::{ListOptions, Page};
use crate::query::Filter;
use crate::serde_helpers::now_millis;
use crate::store::{EntityStore, Patch};

/// Generic repository enforcing the soft-delete lifecycle.
///
/// Read and update paths see only the active set unless stated otherwise;
/// soft-deleted records stay in storage, invisible to `find_by_id`,
/// `find_all` and `update_by_id`, until restored or hard-deleted.
pub struct Repository<T, S> {
    store: S,
    _entity: PhantomData<T>,
}

impl<T, S> Repository<T, S>
where
    T: Entity,
    S: EntityStore<T>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Direct store access for specialized queries layered on top.
    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self, input), fields(collection = T::COLLECTION))]
    pub async fn create(&self, input: T::Create) -> RepositoryResult<T> {
        let record = self.store.insert(input).await?;
        tracing::info!(entity_id = %record.id(), "Record created");
        Ok(record)
    }

    /// Lookup by id on the active set.
    ///
    /// The id is parsed before the store is touched; a malformed value
    /// fails with [`RepositoryError::Validation`] instead of reading as a
    /// miss.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let filter = Filter::new()
            .eq(fields::ID, id.to_string())
            .flag(fields::IS_DELETED, false);
        self.store.find_one(&filter).await
    }

    /// Offset-paginated listing of the active set.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn find_all(&self, options: ListOptions) -> RepositoryResult<Page<T>> {
        self.list(options, false).await
    }

    /// Same mechanics as [`find_all`](Repository::find_all), over the
    /// soft-deleted set.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn find_deleted(&self, options: ListOptions) -> RepositoryResult<Page<T>> {
        self.list(options, true).await
    }

    async fn list(&self, options: ListOptions, deleted: bool) -> RepositoryResult<Page<T>> {
        let page = options.page.max(1);
        let limit = options.limit.max(1);
        // The visibility flag always wins over the caller's filter.
        let filter = options.filter.enforce_flag(fields::IS_DELETED, deleted);
        let skip = (page - 1) * limit;

        let (data, total_count) = tokio::try_join!(
            self.store.find_many(&filter, &options.sort, skip, limit),
            self.store.count(&filter),
        )?;

        Ok(Page {
            data,
            total_pages: total_count.div_ceil(limit),
            current_page: page,
            total_count,
        })
    }

    /// Partial update on the active set; soft-deleted records are not
    /// updatable and report `None`.
    #[instrument(skip(self, update), fields(collection = T::COLLECTION))]
    pub async fn update_by_id(&self, id: &str, update: T::Update) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let guard = Filter::new().flag(fields::IS_DELETED, false);
        let updated = self
            .store
            .update_by_id(id, &guard, Patch::Fields(update))
            .await?;
        if updated.is_some() {
            tracing::info!(entity_id = %id, "Record updated");
        }
        Ok(updated)
    }

    /// Soft delete: flips `is_deleted` and stamps `deleted_at`.
    ///
    /// Runs without a not-yet-deleted guard, so deleting an already
    /// deleted record succeeds again and refreshes `deleted_at`.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn soft_delete(&self, id: &str) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let deleted = self
            .store
            .update_by_id(
                id,
                &Filter::new(),
                Patch::SoftDelete {
                    deleted_at: now_millis(),
                },
            )
            .await?;
        if deleted.is_some() {
            tracing::info!(entity_id = %id, "Record soft-deleted");
        }
        Ok(deleted)
    }

    /// Clear the soft-delete flag and `deleted_at`. All other fields keep
    /// the values they had when the record was deleted.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn restore(&self, id: &str) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let restored = self
            .store
            .update_by_id(id, &Filter::new(), Patch::Restore)
            .await?;
        if restored.is_some() {
            tracing::info!(entity_id = %id, "Record restored");
        }
        Ok(restored)
    }

    /// Permanent removal, regardless of soft-delete state. Absent ids are
    /// a no-op.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        let id = parse_id(id)?;
        self.store.delete_by_id(id).await
    }
}

fn parse_id(raw: &str) -> RepositoryResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RepositoryError::Validation(format!("invalid id '{raw}'")))
}

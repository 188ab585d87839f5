//! Product repository: the generic soft-delete core plus slug lookup and
//! cursor pagination.

use chrono::{DateTime, Utc};
use repository::{
    fields, EntityStore, Filter, ListOptions, MongoEntityStore, Page, Repository, Sort,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::CatalogResult;
use crate::models::{CursorQuery, NewProduct, Product, UpdateProduct};

/// Default batch size for the cursor listing.
pub const DEFAULT_SCROLL_LIMIT: u64 = 10;

/// One batch of the cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorPage {
    pub data: Vec<Product>,
    /// `created_at` of the last record in `data`; `None` for an empty
    /// batch. Feed it back as `last_created_at` to fetch the next batch.
    pub next_cursor: Option<DateTime<Utc>>,
    /// Heuristic: true whenever the batch came back full. No count query
    /// is issued, so a terminal batch holding exactly `limit` records
    /// still reports true; the follow-up call returns an empty batch with
    /// false.
    pub has_more: bool,
}

/// Repository for [`Product`] records over any [`EntityStore`].
pub struct ProductRepository<S: EntityStore<Product>> {
    inner: Repository<Product, S>,
}

impl<S: EntityStore<Product>> ProductRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        Ok(self.inner.create(input).await?)
    }

    /// Lookup by id on the active set.
    pub async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.inner.find_by_id(id).await?)
    }

    /// Exact-match lookup on the active set. Slugs are normalized to
    /// lowercase at write time, so no case folding happens here.
    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>> {
        let filter = Filter::new()
            .eq("slug", slug)
            .flag(fields::IS_DELETED, false);
        Ok(self.inner.store().find_one(&filter).await?)
    }

    /// Offset-paginated listing of active products.
    pub async fn find_all(&self, options: ListOptions) -> CatalogResult<Page<Product>> {
        Ok(self.inner.find_all(options).await?)
    }

    /// Offset-paginated listing of soft-deleted products, most recently
    /// deleted first (a soft delete refreshes `updated_at`).
    pub async fn find_deleted(
        &self,
        page: u64,
        limit: u64,
        filter: Filter,
    ) -> CatalogResult<Page<Product>> {
        let options = ListOptions {
            page,
            limit,
            filter,
            sort: Sort::recently_updated(),
        };
        Ok(self.inner.find_deleted(options).await?)
    }

    /// Cursor-paginated listing of the active set, newest first.
    ///
    /// Fetches records strictly older than the cursor, so a batch is never
    /// re-served even when new products land between calls. No count
    /// query is issued; see [`CursorPage::has_more`].
    #[instrument(skip(self))]
    pub async fn infinite_scroll(&self, query: CursorQuery) -> CatalogResult<CursorPage> {
        let limit = query.limit.unwrap_or(DEFAULT_SCROLL_LIMIT).max(1);

        let mut filter = Filter::new().flag(fields::IS_DELETED, false);
        if let Some(cursor) = query.last_created_at {
            filter = filter.before(fields::CREATED_AT, cursor);
        }

        let data = self
            .inner
            .store()
            .find_many(&filter, &Sort::created_desc(), 0, limit)
            .await?;

        let has_more = data.len() as u64 == limit;
        let next_cursor = data.last().map(|product| product.created_at);

        Ok(CursorPage {
            data,
            next_cursor,
            has_more,
        })
    }

    /// Partial update on the active set; soft-deleted products are not
    /// updatable.
    pub async fn update_by_id(
        &self,
        id: &str,
        update: UpdateProduct,
    ) -> CatalogResult<Option<Product>> {
        Ok(self.inner.update_by_id(id, update).await?)
    }

    pub async fn soft_delete(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.inner.soft_delete(id).await?)
    }

    pub async fn restore(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.inner.restore(id).await?)
    }

    /// Permanent removal; kept for operational cleanup, not wired to any
    /// service path.
    pub async fn delete_by_id(&self, id: &str) -> CatalogResult<()> {
        Ok(self.inner.delete_by_id(id).await?)
    }
}

impl ProductRepository<MongoEntityStore<Product>> {
    /// Create the unique slug index and the listing index. Call once at
    /// startup.
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        Ok(self.inner.store().init_indexes().await?)
    }
}

//! MongoDB-backed [`EntityStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_document, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{fields, Entity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::query::{Clause, Direction, Filter, Sort};
use crate::serde_helpers::now_millis;
use crate::store::{EntityStore, Patch};

/// Store implementation over a typed MongoDB collection.
///
/// The collection name and unique indexes come from the [`Entity`]
/// definition, so one instance per entity type is all the wiring needed.
pub struct MongoEntityStore<T: Entity> {
    collection: Collection<T>,
}

impl<T: Entity> MongoEntityStore<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<T>(T::COLLECTION),
        }
    }

    /// Direct access to the underlying collection for queries the typed
    /// vocabulary does not cover.
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// Create one unique index per [`Entity::UNIQUE_FIELDS`] entry plus
    /// the compound index backing the default listing sort. Call once at
    /// startup; index creation is idempotent.
    pub async fn init_indexes(&self) -> RepositoryResult<()> {
        let mut indexes: Vec<IndexModel> = T::UNIQUE_FIELDS
            .iter()
            .map(|field| {
                let mut keys = Document::new();
                keys.insert(*field, 1);
                IndexModel::builder()
                    .keys(keys)
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name(format!("idx_{field}_unique"))
                            .build(),
                    )
                    .build()
            })
            .collect();

        let mut listing_keys = Document::new();
        listing_keys.insert(fields::IS_DELETED, 1);
        listing_keys.insert(fields::CREATED_AT, -1);
        indexes.push(
            IndexModel::builder()
                .keys(listing_keys)
                .options(
                    IndexOptions::builder()
                        .name("idx_visibility_created".to_string())
                        .build(),
                )
                .build(),
        );

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = T::COLLECTION, "Indexes created");
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MongoEntityStore<T> {
    #[instrument(skip(self, input), fields(collection = T::COLLECTION))]
    async fn insert(&self, input: T::Create) -> RepositoryResult<T> {
        let record = T::new_record(input);
        self.collection
            .insert_one(&record)
            .await
            .map_err(RepositoryError::from_mongo)?;
        tracing::debug!(entity_id = %record.id(), "Record inserted");
        Ok(record)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_one(&self, filter: &Filter) -> RepositoryResult<Option<T>> {
        let record = self.collection.find_one(filter_to_document(filter)).await?;
        Ok(record)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: u64,
        limit: u64,
    ) -> RepositoryResult<Vec<T>> {
        let options = FindOptions::builder()
            .sort(sort_to_document(sort))
            .skip(skip)
            .limit(limit as i64)
            .build();

        let cursor = self
            .collection
            .find(filter_to_document(filter))
            .with_options(options)
            .await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn count(&self, filter: &Filter) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter_to_document(filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, patch), fields(collection = T::COLLECTION))]
    async fn update_by_id(
        &self,
        id: Uuid,
        guard: &Filter,
        patch: Patch<T::Update>,
    ) -> RepositoryResult<Option<T>> {
        let mut query = filter_to_document(guard);
        query.insert(fields::ID, id.to_string());

        let update = patch_to_update(patch)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(query, update)
            .with_options(options)
            .await
            .map_err(RepositoryError::from_mongo)?;
        Ok(updated)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await?;
        tracing::debug!(entity_id = %id, deleted_count = result.deleted_count, "Hard delete");
        Ok(())
    }
}

/// Translate a [`Filter`] into a MongoDB filter document.
///
/// Search terms are regex-escaped so they match as literal substrings.
fn filter_to_document(filter: &Filter) -> Document {
    let mut document = Document::new();
    for clause in filter.clauses() {
        match clause {
            Clause::Eq { field, value } => {
                document.insert(*field, value.clone());
            }
            Clause::Flag { field, value } => {
                document.insert(*field, *value);
            }
            Clause::Search { fields, term } => {
                let pattern = regex::escape(term);
                let alternatives: Vec<Document> = fields
                    .iter()
                    .map(|field| {
                        let mut alternative = Document::new();
                        alternative.insert(*field, doc! { "$regex": &pattern, "$options": "i" });
                        alternative
                    })
                    .collect();
                document.insert("$or", alternatives);
            }
            Clause::Before { field, cutoff } => {
                document.insert(*field, doc! { "$lt": bson_datetime(*cutoff) });
            }
        }
    }
    document
}

fn sort_to_document(sort: &Sort) -> Document {
    let mut document = Document::new();
    for (key, direction) in sort.keys() {
        let value = match direction {
            Direction::Asc => 1,
            Direction::Desc => -1,
        };
        document.insert(key.as_field(), value);
    }
    document
}

/// Build the `$set` update for a [`Patch`]. Every variant stamps
/// `updated_at`.
fn patch_to_update<U: Serialize>(patch: Patch<U>) -> RepositoryResult<Document> {
    let mut set = match patch {
        Patch::Fields(update) => to_document(&update)?,
        Patch::SoftDelete { deleted_at } => {
            let mut set = Document::new();
            set.insert(fields::IS_DELETED, true);
            set.insert(fields::DELETED_AT, bson_datetime(deleted_at));
            set
        }
        Patch::Restore => {
            let mut set = Document::new();
            set.insert(fields::IS_DELETED, false);
            set.insert(fields::DELETED_AT, Bson::Null);
            set
        }
    };
    set.insert(fields::UPDATED_AT, bson_datetime(now_millis()));
    Ok(doc! { "$set": set })
}

fn bson_datetime(value: DateTime<Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_millis(
        value.timestamp_millis(),
    ))
}

//! In-memory [`EntityStore`] used as the test double and for examples.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{from_document, to_document, Bson, Document};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entity::{fields, Entity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::query::{Clause, Direction, Filter, Sort, SortKey};
use crate::serde_helpers::now_millis;
use crate::store::{EntityStore, Patch};

/// HashMap-backed store evaluating the same query semantics as the
/// MongoDB implementation, including [`Entity::UNIQUE_FIELDS`]
/// enforcement.
///
/// Records are matched and sorted through their BSON projection, so a
/// record behaves exactly as it would once serialized: timestamps compare
/// at millisecond precision, ids as strings.
#[derive(Debug, Clone)]
pub struct InMemoryEntityStore<T: Entity> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> InMemoryEntityStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a fully-formed record as-is, bypassing
    /// [`Entity::new_record`]. Tests use this to control ids and
    /// timestamps.
    pub async fn seed(&self, record: T) {
        self.records.write().await.insert(record.id(), record);
    }

    fn ensure_unique(
        records: &HashMap<Uuid, T>,
        candidate: &Document,
        exclude: Option<Uuid>,
    ) -> RepositoryResult<()> {
        for field in T::UNIQUE_FIELDS {
            let Some(value) = candidate.get(field) else {
                continue;
            };
            if value == &Bson::Null {
                continue;
            }
            for (id, existing) in records {
                if Some(*id) == exclude {
                    continue;
                }
                if to_document(existing)?.get(field) == Some(value) {
                    return Err(RepositoryError::DuplicateKey(format!("{field}: {value}")));
                }
            }
        }
        Ok(())
    }
}

impl<T: Entity> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryEntityStore<T> {
    async fn insert(&self, input: T::Create) -> RepositoryResult<T> {
        let record = T::new_record(input);
        let document = to_document(&record)?;

        let mut records = self.records.write().await;
        Self::ensure_unique(&records, &document, None)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn find_one(&self, filter: &Filter) -> RepositoryResult<Option<T>> {
        let records = self.records.read().await;
        for record in records.values() {
            if matches_filter(&to_document(record)?, filter) {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: u64,
        limit: u64,
    ) -> RepositoryResult<Vec<T>> {
        let records = self.records.read().await;
        let mut matched = Vec::new();
        for record in records.values() {
            let document = to_document(record)?;
            if matches_filter(&document, filter) {
                matched.push((document, record.clone()));
            }
        }
        matched.sort_by(|(a, _), (b, _)| compare_documents(a, b, sort));

        Ok(matched
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|(_, record)| record)
            .collect())
    }

    async fn count(&self, filter: &Filter) -> RepositoryResult<u64> {
        let records = self.records.read().await;
        let mut count = 0;
        for record in records.values() {
            if matches_filter(&to_document(record)?, filter) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        guard: &Filter,
        patch: Patch<T::Update>,
    ) -> RepositoryResult<Option<T>> {
        let mut records = self.records.write().await;
        let Some(existing) = records.get(&id) else {
            return Ok(None);
        };

        let mut document = to_document(existing)?;
        if !matches_filter(&document, guard) {
            return Ok(None);
        }

        match patch {
            Patch::Fields(update) => {
                document.extend(to_document(&update)?);
            }
            Patch::SoftDelete { deleted_at } => {
                document.insert(fields::IS_DELETED, true);
                document.insert(fields::DELETED_AT, bson_datetime(deleted_at));
            }
            Patch::Restore => {
                document.insert(fields::IS_DELETED, false);
                document.insert(fields::DELETED_AT, Bson::Null);
            }
        }
        document.insert(fields::UPDATED_AT, bson_datetime(now_millis()));

        Self::ensure_unique(&records, &document, Some(id))?;
        let updated: T = from_document(document)?;
        records.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        self.records.write().await.remove(&id);
        Ok(())
    }
}

fn bson_datetime(value: chrono::DateTime<chrono::Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_millis(
        value.timestamp_millis(),
    ))
}

/// Evaluate a [`Filter`] against a record's BSON projection.
fn matches_filter(document: &Document, filter: &Filter) -> bool {
    filter.clauses().iter().all(|clause| match clause {
        Clause::Eq { field, value } => document
            .get_str(field)
            .map(|stored| stored == value)
            .unwrap_or(false),
        Clause::Flag { field, value } => document
            .get_bool(field)
            .map(|stored| stored == *value)
            .unwrap_or(false),
        Clause::Search { fields, term } => {
            let needle = term.to_lowercase();
            fields.iter().any(|field| {
                document
                    .get_str(field)
                    .map(|stored| stored.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
        Clause::Before { field, cutoff } => document
            .get_datetime(field)
            .map(|stored| stored.timestamp_millis() < cutoff.timestamp_millis())
            .unwrap_or(false),
    })
}

fn compare_documents(a: &Document, b: &Document, sort: &Sort) -> Ordering {
    for (key, direction) in sort.keys() {
        let field = key.as_field();
        let ordering = match key {
            SortKey::CreatedAt | SortKey::UpdatedAt => {
                let left = a
                    .get_datetime(field)
                    .map(|value| value.timestamp_millis())
                    .unwrap_or(i64::MIN);
                let right = b
                    .get_datetime(field)
                    .map(|value| value.timestamp_millis())
                    .unwrap_or(i64::MIN);
                left.cmp(&right)
            }
            SortKey::Id => a.get_str(field).unwrap_or("").cmp(b.get_str(field).unwrap_or("")),
        };
        let ordering = match direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn record(name: &str, deleted: bool, created_millis: i64) -> Document {
        doc! {
            "_id": Uuid::now_v7().to_string(),
            "name": name,
            "is_deleted": deleted,
            "created_at": mongodb::bson::DateTime::from_millis(created_millis),
        }
    }

    #[test]
    fn test_matches_eq_and_flag() {
        let document = record("Walnut Desk", false, 1_000);

        let hit = Filter::new()
            .eq("name", "Walnut Desk")
            .flag(fields::IS_DELETED, false);
        let miss = Filter::new().flag(fields::IS_DELETED, true);

        assert!(matches_filter(&document, &hit));
        assert!(!matches_filter(&document, &miss));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let document = record("Walnut Desk Organizer", false, 1_000);

        assert!(matches_filter(
            &document,
            &Filter::new().search(&["name"], "WALNUT")
        ));
        assert!(matches_filter(
            &document,
            &Filter::new().search(&["name"], "desk org")
        ));
        assert!(!matches_filter(
            &document,
            &Filter::new().search(&["name"], "steel")
        ));
    }

    #[test]
    fn test_search_matches_any_listed_field() {
        let mut document = record("Steel Lamp", false, 1_000);
        document.insert("description", "brushed walnut base");

        assert!(matches_filter(
            &document,
            &Filter::new().search(&["name", "description"], "walnut")
        ));
    }

    #[test]
    fn test_before_is_strict() {
        let document = record("Walnut Desk", false, 1_000);
        let cutoff = chrono::DateTime::from_timestamp_millis(1_000).unwrap();

        assert!(!matches_filter(
            &document,
            &Filter::new().before(fields::CREATED_AT, cutoff)
        ));

        let later = chrono::DateTime::from_timestamp_millis(1_001).unwrap();
        assert!(matches_filter(
            &document,
            &Filter::new().before(fields::CREATED_AT, later)
        ));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let document = record("Walnut Desk", false, 1_000);

        assert!(!matches_filter(
            &document,
            &Filter::new().eq("slug", "walnut-desk")
        ));
    }

    #[test]
    fn test_compare_newest_first() {
        let older = record("older", false, 1_000);
        let newer = record("newer", false, 2_000);

        assert_eq!(
            compare_documents(&newer, &older, &Sort::newest_first()),
            Ordering::Less
        );
        assert_eq!(
            compare_documents(&older, &newer, &Sort::newest_first()),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_ties_break_on_id_ascending() {
        let mut first = record("first", false, 1_000);
        let mut second = record("second", false, 1_000);
        first.insert("_id", "00000000-0000-7000-8000-000000000001");
        second.insert("_id", "00000000-0000-7000-8000-000000000002");

        assert_eq!(
            compare_documents(&first, &second, &Sort::newest_first()),
            Ordering::Less
        );
    }
}

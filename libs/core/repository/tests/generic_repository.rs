//! End-to-end tests of the generic repository over the in-memory store.
//!
//! The `Note` entity lives only in this test and proves the layer works
//! for any type implementing `Entity`, not just the shipped domains.

use chrono::{DateTime, Duration, Utc};
use repository::{
    fields, now_millis, Entity, Filter, InMemoryEntityStore, ListOptions, Repository,
    RepositoryError, Sort,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    #[serde(rename = "_id", alias = "id")]
    id: Uuid,
    title: String,
    body: String,
    code: String,
    #[serde(default)]
    is_deleted: bool,
    #[serde(with = "repository::serde_helpers::optional_datetime", default)]
    deleted_at: Option<DateTime<Utc>>,
    #[serde(with = "repository::serde_helpers::datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "repository::serde_helpers::datetime")]
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct NewNote {
    title: String,
    body: String,
    code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl Entity for Note {
    type Create = NewNote;
    type Update = NoteUpdate;

    const COLLECTION: &'static str = "notes";
    const UNIQUE_FIELDS: &'static [&'static str] = &["code"];

    fn new_record(input: NewNote) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            body: input.body,
            code: input.code,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

type NoteStore = InMemoryEntityStore<Note>;
type NoteRepository = Repository<Note, NoteStore>;

fn note_repository() -> (NoteStore, NoteRepository) {
    let store = NoteStore::new();
    (store.clone(), Repository::new(store))
}

fn new_note(title: &str, code: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        body: format!("{title} body"),
        code: code.to_string(),
    }
}

fn seeded_note(title: &str, code: &str, created_at: DateTime<Utc>) -> Note {
    Note {
        id: Uuid::now_v7(),
        title: title.to_string(),
        body: format!("{title} body"),
        code: code.to_string(),
        is_deleted: false,
        deleted_at: None,
        created_at,
        updated_at: created_at,
    }
}

/// 25 notes with strictly decreasing `created_at`, so `note-00` is the
/// newest and pagination order is deterministic.
async fn seed_backdated_notes(store: &NoteStore, count: usize) {
    let base = now_millis();
    for i in 0..count {
        let created_at = base - Duration::seconds(i as i64);
        store
            .seed(seeded_note(
                &format!("note-{i:02}"),
                &format!("code-{i:02}"),
                created_at,
            ))
            .await;
    }
}

#[tokio::test]
async fn test_create_assigns_identity_and_timestamps() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("First", "code-first")).await.unwrap();

    assert!(!note.id.is_nil());
    assert!(!note.is_deleted);
    assert_eq!(note.deleted_at, None);
    assert_eq!(note.created_at, note.updated_at);
}

#[tokio::test]
async fn test_find_by_id_round_trip() {
    let (_, repo) = note_repository();

    let created = repo.create(new_note("First", "code-first")).await.unwrap();
    let found = repo.find_by_id(&created.id.to_string()).await.unwrap();

    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn test_find_by_id_misses_absent_id() {
    let (_, repo) = note_repository();

    let found = repo.find_by_id(&Uuid::now_v7().to_string()).await.unwrap();

    assert_eq!(found, None);
}

#[tokio::test]
async fn test_malformed_id_is_rejected_before_the_store() {
    let (_, repo) = note_repository();

    let lookups = [
        repo.find_by_id("not-a-uuid").await,
        repo.soft_delete("not-a-uuid").await,
        repo.restore("not-a-uuid").await,
        repo.update_by_id("not-a-uuid", NoteUpdate::default()).await,
    ];
    for result in lookups {
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    let deletion = repo.delete_by_id("").await;
    assert!(matches!(deletion, Err(RepositoryError::Validation(_))));
}

#[tokio::test]
async fn test_soft_deleted_records_are_invisible() {
    let (_, repo) = note_repository();

    let kept = repo.create(new_note("Kept", "code-kept")).await.unwrap();
    let dropped = repo.create(new_note("Dropped", "code-dropped")).await.unwrap();

    let deleted = repo.soft_delete(&dropped.id.to_string()).await.unwrap();
    let deleted = deleted.unwrap();
    assert!(deleted.is_deleted);
    assert!(deleted.deleted_at.is_some());

    assert_eq!(repo.find_by_id(&dropped.id.to_string()).await.unwrap(), None);

    let active = repo.find_all(ListOptions::default()).await.unwrap();
    assert_eq!(active.total_count, 1);
    assert_eq!(active.data[0].id, kept.id);

    let trashed = repo.find_deleted(ListOptions::default()).await.unwrap();
    assert_eq!(trashed.total_count, 1);
    assert_eq!(trashed.data[0].id, dropped.id);
}

#[tokio::test]
async fn test_soft_delete_is_idempotent() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("Twice", "code-twice")).await.unwrap();
    let id = note.id.to_string();

    let first = repo.soft_delete(&id).await.unwrap().unwrap();
    let second = repo.soft_delete(&id).await.unwrap().unwrap();

    assert!(second.is_deleted);
    assert!(second.deleted_at.unwrap() >= first.deleted_at.unwrap());
}

#[tokio::test]
async fn test_update_by_id_merges_partial_fields() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("Draft", "code-draft")).await.unwrap();

    let updated = repo
        .update_by_id(
            &note.id.to_string(),
            NoteUpdate {
                title: Some("Final".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.body, note.body);
    assert_eq!(updated.code, note.code);
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at >= note.updated_at);
}

#[tokio::test]
async fn test_update_skips_soft_deleted_records() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("Gone", "code-gone")).await.unwrap();
    repo.soft_delete(&note.id.to_string()).await.unwrap();

    let updated = repo
        .update_by_id(
            &note.id.to_string(),
            NoteUpdate {
                title: Some("Should not land".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated, None);
}

#[tokio::test]
async fn test_restore_round_trip() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("Phoenix", "code-phoenix")).await.unwrap();
    let id = note.id.to_string();

    repo.soft_delete(&id).await.unwrap();
    let restored = repo.restore(&id).await.unwrap().unwrap();

    assert!(!restored.is_deleted);
    assert_eq!(restored.deleted_at, None);
    assert_eq!(restored.title, note.title);
    assert_eq!(restored.code, note.code);
    assert_eq!(restored.created_at, note.created_at);

    assert!(repo.find_by_id(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_hard_delete_removes_record_entirely() {
    let (_, repo) = note_repository();

    let note = repo.create(new_note("Doomed", "code-doomed")).await.unwrap();
    let id = note.id.to_string();

    repo.delete_by_id(&id).await.unwrap();

    assert_eq!(repo.find_by_id(&id).await.unwrap(), None);
    let trashed = repo.find_deleted(ListOptions::default()).await.unwrap();
    assert_eq!(trashed.total_count, 0);

    // Deleting again is a no-op, not an error.
    repo.delete_by_id(&id).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_unique_field_rejected_on_create() {
    let (_, repo) = note_repository();

    repo.create(new_note("First", "code-shared")).await.unwrap();
    let err = repo
        .create(new_note("Second", "code-shared"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_duplicate_unique_field_rejected_on_update() {
    let (_, repo) = note_repository();

    repo.create(new_note("First", "code-a")).await.unwrap();
    let second = repo.create(new_note("Second", "code-b")).await.unwrap();

    let err = repo
        .update_by_id(
            &second.id.to_string(),
            NoteUpdate {
                code: Some("code-a".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_pagination_window_and_math() {
    let (store, repo) = note_repository();
    seed_backdated_notes(&store, 25).await;

    let page = repo
        .find_all(ListOptions {
            page: 2,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);

    let titles: Vec<_> = page.data.iter().map(|note| note.title.as_str()).collect();
    let expected: Vec<String> = (10..20).map(|i| format!("note-{i:02}")).collect();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn test_pagination_is_complete_and_disjoint() {
    let (store, repo) = note_repository();
    seed_backdated_notes(&store, 25).await;

    let mut seen = std::collections::HashSet::new();
    for page_number in 1..=3 {
        let page = repo
            .find_all(ListOptions {
                page: page_number,
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        for note in &page.data {
            assert!(seen.insert(note.id), "record served twice: {}", note.title);
        }
    }
    assert_eq!(seen.len(), 25);

    let last = repo
        .find_all(ListOptions {
            page: 3,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(last.data.len(), 5);
}

#[tokio::test]
async fn test_pagination_clamps_page_and_limit() {
    let (store, repo) = note_repository();
    seed_backdated_notes(&store, 3).await;

    let page = repo
        .find_all(ListOptions {
            page: 0,
            limit: 0,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.current_page, 1);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn test_pagination_past_the_end_is_empty_not_an_error() {
    let (store, repo) = note_repository();
    seed_backdated_notes(&store, 5).await;

    let page = repo
        .find_all(ListOptions {
            page: 4,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.total_count, 5);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_visibility_policy_cannot_be_overridden() {
    let (_, repo) = note_repository();

    let kept = repo.create(new_note("Kept", "code-kept")).await.unwrap();
    let dropped = repo.create(new_note("Dropped", "code-dropped")).await.unwrap();
    repo.soft_delete(&dropped.id.to_string()).await.unwrap();

    // A caller trying to flip the visibility flag still sees active
    // records only.
    let page = repo
        .find_all(ListOptions {
            filter: Filter::new().flag(fields::IS_DELETED, true),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].id, kept.id);
}

#[tokio::test]
async fn test_filtered_count_matches_filtered_data() {
    let (store, repo) = note_repository();
    let base = now_millis();
    for (i, title) in ["walnut shelf", "walnut desk", "walnut lamp", "steel lamp", "oak bench"]
        .iter()
        .enumerate()
    {
        let created_at = base - Duration::seconds(i as i64);
        store
            .seed(seeded_note(title, &format!("code-{i}"), created_at))
            .await;
    }

    let page = repo
        .find_all(ListOptions {
            limit: 2,
            filter: Filter::new().search(&["title"], "walnut"),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_find_deleted_sorts_by_most_recent_update() {
    let (store, repo) = note_repository();
    let base = now_millis();

    for (i, title) in ["old-delete", "new-delete"].iter().enumerate() {
        let mut note = seeded_note(title, &format!("code-{i}"), base - Duration::hours(1));
        note.is_deleted = true;
        note.deleted_at = Some(base - Duration::minutes(10 - i as i64));
        note.updated_at = note.deleted_at.unwrap();
        store.seed(note).await;
    }

    let page = repo
        .find_deleted(ListOptions {
            sort: Sort::recently_updated(),
            ..Default::default()
        })
        .await
        .unwrap();

    let titles: Vec<_> = page.data.iter().map(|note| note.title.as_str()).collect();
    assert_eq!(titles, vec!["new-delete", "old-delete"]);
}

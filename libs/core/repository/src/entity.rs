//! Entity contract shared by every repository-managed record.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Canonical field names in the serialized form of every [`Entity`].
///
/// Stores build filters, sorts and patches against these names, so an
/// entity's serde attributes must map onto them: `id` renamed to `_id`,
/// timestamps stored as BSON datetimes via [`crate::serde_helpers`].
pub mod fields {
    pub const ID: &str = "_id";
    pub const IS_DELETED: &str = "is_deleted";
    pub const DELETED_AT: &str = "deleted_at";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// A soft-deletable, timestamped record with a UUID identity.
///
/// `Create` is the input accepted by [`new_record`](Entity::new_record);
/// `Update` is a partial patch whose serialized fields are merged over the
/// stored document. Optional `Update` fields should carry
/// `skip_serializing_if = "Option::is_none"` so absent fields leave stored
/// values untouched.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + 'static
{
    type Create: Send + Sync + 'static;
    type Update: Serialize + Clone + Send + Sync + 'static;

    /// Collection the entity persists to.
    const COLLECTION: &'static str;

    /// Serialized field names carrying a unique constraint. Backed by
    /// unique indexes in MongoDB and checked explicitly by the in-memory
    /// store.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Build a full record from creation input: fresh UUIDv7 id,
    /// `is_deleted` false, both timestamps set to [`crate::now_millis`].
    fn new_record(input: Self::Create) -> Self;

    fn id(&self) -> Uuid;
    fn is_deleted(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

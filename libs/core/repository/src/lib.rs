//! Persistence core: soft-deletable entities, typed queries, and a
//! generic repository with offset pagination.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  Repository  │  ← soft-delete visibility, offset pagination
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │ EntityStore  │  ← typed queries (MongoDB or in-memory)
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │    Entity    │  ← id, is_deleted, timestamps, unique fields
//! └──────────────┘
//! ```
//!
//! Domains implement [`Entity`] for their records and either use
//! [`Repository`] directly or wrap it with domain-specific queries. Both
//! store implementations evaluate the same [`Filter`]/[`Sort`] vocabulary,
//! so tests run against [`InMemoryEntityStore`] and production against
//! [`MongoEntityStore`] without behavioral drift.

pub mod entity;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod page;
pub mod query;
pub mod repository;
pub mod serde_helpers;
pub mod store;

pub use entity::{fields, Entity};
pub use error::{is_duplicate_key_error, RepositoryError, RepositoryResult};
pub use memory::InMemoryEntityStore;
pub use mongo::MongoEntityStore;
pub use page::{ListOptions, Page};
pub use query::{Clause, Direction, Filter, Sort, SortKey};
pub use repository::Repository;
pub use serde_helpers::now_millis;
pub use store::{EntityStore, Patch};

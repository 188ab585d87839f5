//! Typed query vocabulary understood by every store implementation.
//!
//! Filters are built from a small set of clauses instead of raw documents
//! so that the MongoDB and in-memory stores evaluate exactly the same
//! semantics.

use chrono::{DateTime, Utc};

use crate::entity::fields;

/// A single predicate clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact match on a string field.
    Eq {
        field: &'static str,
        value: String,
    },
    /// Exact match on a boolean field.
    Flag {
        field: &'static str,
        value: bool,
    },
    /// Case-insensitive substring match on any of the fields (logical OR).
    Search {
        fields: &'static [&'static str],
        term: String,
    },
    /// Strictly-less-than comparison on a datetime field.
    Before {
        field: &'static str,
        cutoff: DateTime<Utc>,
    },
}

impl Clause {
    /// The single field this clause constrains; `Search` spans several
    /// and reports none.
    fn target_field(&self) -> Option<&'static str> {
        match self {
            Clause::Eq { field, .. }
            | Clause::Flag { field, .. }
            | Clause::Before { field, .. } => Some(field),
            Clause::Search { .. } => None,
        }
    }
}

/// Conjunction of [`Clause`]s; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq {
            field,
            value: value.into(),
        });
        self
    }

    pub fn flag(mut self, field: &'static str, value: bool) -> Self {
        self.clauses.push(Clause::Flag { field, value });
        self
    }

    pub fn search(mut self, fields: &'static [&'static str], term: impl Into<String>) -> Self {
        self.clauses.push(Clause::Search {
            fields,
            term: term.into(),
        });
        self
    }

    pub fn before(mut self, field: &'static str, cutoff: DateTime<Utc>) -> Self {
        self.clauses.push(Clause::Before { field, cutoff });
        self
    }

    /// Pin `field` to `value`, dropping any clause already naming that
    /// field. Listing paths use this so the soft-delete visibility policy
    /// cannot be overridden by a caller-supplied filter.
    pub fn enforce_flag(mut self, field: &'static str, value: bool) -> Self {
        self.clauses
            .retain(|clause| clause.target_field() != Some(field));
        self.clauses.push(Clause::Flag { field, value });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Sortable fields. Every entity carries these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Id,
}

impl SortKey {
    pub fn as_field(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => fields::CREATED_AT,
            SortKey::UpdatedAt => fields::UPDATED_AT,
            SortKey::Id => fields::ID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordered list of sort keys applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    keys: Vec<(SortKey, Direction)>,
}

impl Sort {
    /// `created_at` descending with ascending id as the tie-break.
    ///
    /// Ids are UUIDv7, so the tie-break keeps records created within the
    /// same millisecond in a stable creation order.
    pub fn newest_first() -> Self {
        Self {
            keys: vec![
                (SortKey::CreatedAt, Direction::Desc),
                (SortKey::Id, Direction::Asc),
            ],
        }
    }

    /// `updated_at` descending with ascending id tie-break. Soft deletes
    /// refresh `updated_at`, so this lists the most recently deleted
    /// records first.
    pub fn recently_updated() -> Self {
        Self {
            keys: vec![
                (SortKey::UpdatedAt, Direction::Desc),
                (SortKey::Id, Direction::Asc),
            ],
        }
    }

    /// `created_at` descending alone, as used by the cursor listing.
    pub fn created_desc() -> Self {
        Self {
            keys: vec![(SortKey::CreatedAt, Direction::Desc)],
        }
    }

    pub fn keys(&self) -> &[(SortKey, Direction)] {
        &self.keys
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::newest_first()
    }
}

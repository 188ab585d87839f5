//! Pagination types for the offset-based listing paths.

use serde::Serialize;

use crate::query::{Filter, Sort};

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Ceiling of `total_count / limit`; 0 when nothing matches.
    pub total_pages: u64,
    /// The 1-based page number that was served.
    pub current_page: u64,
    /// Total matches across all pages, not just this one.
    pub total_count: u64,
}

/// Options accepted by the offset-paginated listing paths.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// 1-based page number; values below 1 are clamped to 1.
    pub page: u64,
    /// Page size; values below 1 are clamped to 1.
    pub limit: u64,
    pub filter: Filter,
    pub sort: Sort,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            filter: Filter::new(),
            sort: Sort::newest_first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_options() {
        let options = ListOptions::default();
        assert_eq!(options.page, 1);
        assert_eq!(options.limit, 10);
        assert!(options.filter.is_empty());
        assert_eq!(options.sort, Sort::newest_first());
    }
}

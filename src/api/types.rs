// src/api/types.rs
//! Pagination types shared by the HTTP client and its decoders.

use serde::Deserialize;

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

/// How many result pages one child-list fetch may consume before it is
/// declared a `PaginationOverrun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(u32);

impl PageLimit {
    pub fn new(max_pages: u32) -> Self {
        Self(max_pages.max(1))
    }

    pub fn max_pages(&self) -> u32 {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(crate::constants::CHILDREN_MAX_PAGES)
    }
}

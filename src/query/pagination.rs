//! Offset/limit windowing over a filtered collection.

use super::ListQuery;
use serde::{Deserialize, Serialize};

/// Page size used when a request omits `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound applied to any requested `limit`.
pub const MAX_LIMIT: usize = 100;

/// An offset window over a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Read `skip`/`limit` from a query. Anything missing, non-numeric or
    /// non-positive falls back to the defaults.
    pub fn from_query(query: &ListQuery, default_limit: usize, max_limit: usize) -> Self {
        let limit = query
            .count("limit")
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        let skip = query.count("skip").unwrap_or(0);
        Self { skip, limit }
    }

    /// Read 1-based `page`/`limit` from a query. `skip` is derived from the page.
    pub fn from_page_query(query: &ListQuery, default_limit: usize, max_limit: usize) -> Self {
        let base = Self::from_query(query, default_limit, max_limit);
        match query.count("page") {
            Some(page) => Self {
                skip: (page - 1).saturating_mul(base.limit),
                limit: base.limit,
            },
            None => base,
        }
    }

    /// 1-based page number this window starts on.
    pub fn page(&self) -> usize {
        self.skip / self.limit.max(1) + 1
    }

    /// Cut the window out of `records`. Never fails and never pads: a `skip`
    /// past the end yields no items, a short tail yields only what is left.
    pub fn window<T>(&self, records: Vec<T>) -> Page<T> {
        let total = records.len();
        let items = records
            .into_iter()
            .skip(self.skip)
            .take(self.limit)
            .collect();
        Page { total, items }
    }
}

/// Filtered total plus the windowed items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }
}

/// Page-number bookkeeping reported by page-addressed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

impl PageMeta {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        let limit = pagination.limit.max(1);
        Self {
            page: pagination.page(),
            limit,
            pages: total.div_ceil(limit),
        }
    }
}

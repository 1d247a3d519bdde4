//! List query engine
//!
//! Every list endpoint takes the same shape of query: reserved `skip` and
//! `limit` plus entity-specific filter keys. The engine filters a snapshot of
//! the collection (AND of all supplied predicates, insertion order kept),
//! counts the survivors, then windows them.

pub mod filter;
pub mod pagination;
pub mod time;

pub use filter::{Filter, FilterBuilder, Predicate, SearchTarget};
pub use pagination::{Page, PageMeta, Pagination, DEFAULT_LIMIT, MAX_LIMIT};

use crate::store::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw query-string parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListQuery(HashMap<String, String>);

impl ListQuery {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Trimmed value of `key`, or `None` when absent or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Positive whole number under `key`. Fractions are truncated; anything
    /// non-numeric, zero or negative reads as absent.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.get(key)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| n.trunc() as usize)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
}

/// A record type that can be listed through the query engine.
pub trait Searchable: Record {
    /// Name of the array field carrying items in list responses.
    const COLLECTION: &'static str;

    /// Predicates recognized for this record type.
    fn filter(query: &ListQuery) -> Filter;
}

/// Filter then window a snapshot of records.
pub fn execute<R: Serialize>(records: Vec<R>, filter: &Filter, pagination: Pagination) -> Page<R> {
    pagination.window(filter.apply(records))
}

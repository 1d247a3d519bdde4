//! Record storage
//!
//! Handlers reach collections through the [`Repository`] trait, injected via
//! `AppState`, so a different backing engine or an isolated test instance
//! can be swapped in without touching the handlers.

mod memory;

pub use memory::MemoryRepository;

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// A stored entity with a numeric primary id and an optional secondary token.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Human readable kind, used in messages ("Coach 7 not found").
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Alternate lookup key.
    fn uid(&self) -> Option<&str> {
        None
    }
}

/// A lookup key as it arrives from a path segment. Matches a record whose
/// id renders to the same string, or whose `uid` is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        record.id().to_string() == self.0 || record.uid() == Some(self.0.as_str())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Partial update applied to a record in place.
pub trait Patch<R>: Send + Sync {
    fn apply(&self, record: &mut R);
}

/// Storage operations shared by every collection.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Snapshot of all records in insertion order.
    async fn list(&self) -> Result<Vec<R>, AppError>;

    async fn get(&self, key: &RecordKey) -> Result<R, AppError>;

    /// Store a new record, assigning the next sequential id.
    async fn create(&self, record: R) -> Result<R, AppError>;

    async fn update(&self, key: &RecordKey, patch: &dyn Patch<R>) -> Result<R, AppError>;

    /// Remove exactly one matching record and hand it back.
    async fn delete(&self, key: &RecordKey) -> Result<R, AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

pub(crate) fn not_found<R: Record>(key: &RecordKey) -> AppError {
    AppError::NotFound(format!("{} {} not found", R::KIND, key))
}

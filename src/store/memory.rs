//! In-memory repository
//!
//! A `Vec` behind a `tokio::sync::RwLock`, so insertion order is the list
//! order. Ids come from a counter that starts above the highest seeded id and
//! never goes back, so deleting a record never causes an id to be reused.

use super::{not_found, Patch, Record, RecordKey, Repository};
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::RwLock;

struct Inner<R> {
    records: Vec<R>,
    next_id: i64,
}

/// Thread-safe in-memory collection
pub struct MemoryRepository<R> {
    inner: RwLock<Inner<R>>,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start from existing records, keeping their ids.
    pub fn with_records(records: Vec<R>) -> Self {
        let next_id = records.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Inner { records, next_id }),
        }
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.records.clone())
    }

    async fn get(&self, key: &RecordKey) -> Result<R, AppError> {
        let inner = self.inner.read().await;
        inner
            .records
            .iter()
            .find(|r| key.matches(*r))
            .cloned()
            .ok_or_else(|| not_found::<R>(key))
    }

    async fn create(&self, mut record: R) -> Result<R, AppError> {
        let mut inner = self.inner.write().await;
        record.set_id(inner.next_id);
        inner.next_id += 1;
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, key: &RecordKey, patch: &dyn Patch<R>) -> Result<R, AppError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| key.matches(&**r))
            .ok_or_else(|| not_found::<R>(key))?;

        let id = record.id();
        patch.apply(record);
        // identity survives any patch
        record.set_id(id);

        Ok(record.clone())
    }

    async fn delete(&self, key: &RecordKey) -> Result<R, AppError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .records
            .iter()
            .position(|r| key.matches(r))
            .ok_or_else(|| not_found::<R>(key))?;

        Ok(inner.records.remove(index))
    }

    async fn count(&self) -> Result<usize, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.records.len())
    }
}

//! The table trait every backend implements.

use crate::record::TaskRecord;
use crate::StoreResult;
use async_trait::async_trait;

/// Single-table access over `(pk, sk)` addressed records.
///
/// `put` is a full-record upsert: a record sharing the same key is replaced
/// wholesale, last writer wins. `delete` is idempotent. `query_by_owner`
/// must return a deterministic order against a stable table; backends order
/// by sort key.
#[async_trait]
pub trait TaskTable: Send + Sync {
    /// Point lookup. Absence is `None`, never an error.
    async fn get(&self, pk: &str, sk: &str) -> StoreResult<Option<TaskRecord>>;

    /// All records under one partition key, ordered by sort key.
    async fn query_by_owner(&self, pk: &str) -> StoreResult<Vec<TaskRecord>>;

    /// Upsert the full record.
    async fn put(&self, record: TaskRecord) -> StoreResult<()>;

    /// Delete by key. Deleting an absent key succeeds.
    async fn delete(&self, pk: &str, sk: &str) -> StoreResult<()>;

    /// Existence check, defaulted over `get`.
    async fn exists(&self, pk: &str, sk: &str) -> StoreResult<bool> {
        Ok(self.get(pk, sk).await?.is_some())
    }
}

//! In-memory table backend.

use crate::record::TaskRecord;
use crate::table::TaskTable;
use crate::StoreResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory [`TaskTable`] used in tests and local runs.
///
/// A `BTreeMap` keyed by `(pk, sk)` gives `query_by_owner` a stable
/// sort-key order for free.
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: RwLock<BTreeMap<(String, String), TaskRecord>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, across all partitions.
    pub fn len(&self) -> usize {
        self.rows.read().expect("table lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskTable for MemoryTable {
    async fn get(&self, pk: &str, sk: &str) -> StoreResult<Option<TaskRecord>> {
        let rows = self.rows.read().expect("table lock poisoned");
        Ok(rows.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn query_by_owner(&self, pk: &str) -> StoreResult<Vec<TaskRecord>> {
        let rows = self.rows.read().expect("table lock poisoned");
        let lower = (pk.to_string(), String::new());
        Ok(rows
            .range(lower..)
            .take_while(|((row_pk, _), _)| row_pk == pk)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn put(&self, record: TaskRecord) -> StoreResult<()> {
        let mut rows = self.rows.write().expect("table lock poisoned");
        rows.insert((record.pk.clone(), record.sk.clone()), record);
        Ok(())
    }

    async fn delete(&self, pk: &str, sk: &str) -> StoreResult<()> {
        let mut rows = self.rows.write().expect("table lock poisoned");
        rows.remove(&(pk.to_string(), sk.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_round_trip() {
        let table = MemoryTable::new();
        let record = TaskRecord::new("USER#1", "LIST#a", Some("milk".to_string()));
        table.put(record.clone()).await.unwrap();

        let fetched = table.get("USER#1", "LIST#a").await.unwrap();
        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn get_absent_is_none() {
        let table = MemoryTable::new();
        assert_eq!(table.get("USER#1", "LIST#a").await.unwrap(), None);
        assert!(!table.exists("USER#1", "LIST#a").await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites_same_key() {
        let table = MemoryTable::new();
        table
            .put(TaskRecord::new("USER#1", "LIST#a", Some("old".to_string())))
            .await
            .unwrap();
        table
            .put(TaskRecord::new("USER#1", "LIST#a", Some("new".to_string())))
            .await
            .unwrap();

        let fetched = table.get("USER#1", "LIST#a").await.unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("new"));
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn query_by_owner_is_partition_scoped_and_ordered() {
        let table = MemoryTable::new();
        table
            .put(TaskRecord::new("USER#1", "LIST#b", None))
            .await
            .unwrap();
        table
            .put(TaskRecord::new("USER#1", "LIST#a", None))
            .await
            .unwrap();
        table
            .put(TaskRecord::new("USER#2", "LIST#c", None))
            .await
            .unwrap();

        let rows = table.query_by_owner("USER#1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sk, "LIST#a");
        assert_eq!(rows[1].sk, "LIST#b");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let table = MemoryTable::new();
        table
            .put(TaskRecord::new("USER#1", "LIST#a", None))
            .await
            .unwrap();

        table.delete("USER#1", "LIST#a").await.unwrap();
        // Deleting again is not an error.
        table.delete("USER#1", "LIST#a").await.unwrap();
        assert!(table.is_empty());
    }
}

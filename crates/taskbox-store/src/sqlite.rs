//! SQLite table backend.

use crate::record::TaskRecord;
use crate::table::TaskTable;
use crate::StoreResult;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    pk          TEXT NOT NULL,
    sk          TEXT NOT NULL,
    description TEXT,
    PRIMARY KEY (pk, sk)
)";

/// Durable [`TaskTable`] backed by a local SQLite database.
///
/// The connection is serialized behind a mutex; calls are short and never
/// hold the guard across an await point.
#[derive(Debug)]
pub struct SqliteTable {
    conn: Mutex<Connection>,
}

impl SqliteTable {
    /// Open (and initialize) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute(SCHEMA, [])?;
        debug!("tasks table ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl TaskTable for SqliteTable {
    async fn get(&self, pk: &str, sk: &str) -> StoreResult<Option<TaskRecord>> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        let record = conn
            .query_row(
                "SELECT pk, sk, description FROM tasks WHERE pk = ?1 AND sk = ?2",
                params![pk, sk],
                |row| {
                    Ok(TaskRecord {
                        pk: row.get(0)?,
                        sk: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    async fn query_by_owner(&self, pk: &str) -> StoreResult<Vec<TaskRecord>> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        let mut stmt = conn
            .prepare("SELECT pk, sk, description FROM tasks WHERE pk = ?1 ORDER BY sk")?;
        let rows = stmt.query_map(params![pk], |row| {
            Ok(TaskRecord {
                pk: row.get(0)?,
                sk: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn put(&self, record: TaskRecord) -> StoreResult<()> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        conn.execute(
            "INSERT INTO tasks (pk, sk, description) VALUES (?1, ?2, ?3)
             ON CONFLICT (pk, sk) DO UPDATE SET description = excluded.description",
            params![record.pk, record.sk, record.description],
        )?;
        Ok(())
    }

    async fn delete(&self, pk: &str, sk: &str) -> StoreResult<()> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        conn.execute(
            "DELETE FROM tasks WHERE pk = ?1 AND sk = ?2",
            params![pk, sk],
        )?;
        Ok(())
    }
}

//! Taskbox storage layer.
//!
//! A single hierarchical key-value table addressed by `(pk, sk)`. The
//! [`TaskTable`] trait is the only surface the domain layer sees; backends
//! implement it for an in-memory map and for SQLite.

pub mod memory;
pub mod record;
pub mod sqlite;
pub mod table;

use thiserror::Error;

pub use memory::MemoryTable;
pub use record::TaskRecord;
pub use sqlite::SqliteTable;
pub use table::TaskTable;

/// Storage error types.
///
/// Absence of a record is never an error — `get` returns `None` and
/// `exists` returns `false`. These variants cover backend failures only.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

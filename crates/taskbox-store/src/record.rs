//! The stored row type.

use serde::{Deserialize, Serialize};

/// One row of the tasks table.
///
/// `pk` is the partition (owner) key, `sk` the sort key. Together they are
/// the record's only identity. Lists carry a `LIST#`-prefixed sort key;
/// items carry their parent list's sort key as `pk` and a bare generated
/// token as `sk`. The short wire names are part of the external contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub pk: String,
    pub sk: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaskRecord {
    /// Build a record from its parts.
    pub fn new(pk: impl Into<String>, sk: impl Into<String>, description: Option<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
            description,
        }
    }

    /// The composite key as a borrowed pair.
    pub fn key(&self) -> (&str, &str) {
        (&self.pk, &self.sk)
    }
}

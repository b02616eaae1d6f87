//! Task domain models.

use serde::{Deserialize, Serialize};
use taskbox_store::TaskRecord;

/// A task record as the domain sees it.
///
/// Same shape as the stored row; the wire names `pk` / `sk` are part of the
/// external contract and survive serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub pk: String,
    pub sk: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Task {
    /// Create a Task from a stored record.
    pub fn from_record(record: TaskRecord) -> Self {
        Self {
            pk: record.pk,
            sk: record.sk,
            description: record.description,
        }
    }

    /// Convert into the stored representation.
    pub fn into_record(self) -> TaskRecord {
        TaskRecord {
            pk: self.pk,
            sk: self.sk,
            description: self.description,
        }
    }

    /// True when the sort key marks this record as a list.
    pub fn is_list(&self) -> bool {
        crate::keys::is_list_sort_key(&self.sk)
    }
}

/// Body of an update-description request.
///
/// The field is optional on purpose: a body without `description` is a
/// validation failure, while `"description": ""` is a valid update. The
/// distinction is lost if this is a plain `String`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescriptionPatch {
    #[serde(default)]
    pub description: Option<String>,
}

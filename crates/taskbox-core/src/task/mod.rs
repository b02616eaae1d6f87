//! List/item domain operations.
//!
//! Each operation is a single validated transition against the table. The
//! hierarchy has exactly two levels: lists live under `USER#` owner keys and
//! items live under their list's sort key, so [`list_children`] serves both
//! "lists of a user" and "items of a list".

pub mod model;

use crate::error::{TaskboxError, TaskboxResult};
use crate::keys::{self, ParentRef, LIST_PREFIX};
use model::{DescriptionPatch, Task};
use taskbox_store::{TaskRecord, TaskTable};
use tracing::{debug, info};

/// Create a list under an owner.
///
/// The caller must supply the bare `LIST#` marker as the sort key; the
/// server assigns the identifier. Any other sort-key value is rejected —
/// callers do not get to pick list ids.
pub async fn create_list<T: TaskTable>(
    table: &T,
    owner_key: &str,
    sort_key_literal: &str,
    description: Option<&str>,
) -> TaskboxResult<Task> {
    if !keys::is_owner_key(owner_key) {
        return Err(TaskboxError::Validation(
            "field 'pk' must be 'USER#<id>'".to_string(),
        ));
    }
    if sort_key_literal != LIST_PREFIX {
        return Err(TaskboxError::Validation(
            "field 'sk' must be exactly 'LIST#'".to_string(),
        ));
    }

    let record = TaskRecord::new(
        owner_key,
        keys::new_list_sort_key(),
        description.map(str::to_string),
    );
    table.put(record.clone()).await?;

    info!(pk = %record.pk, sk = %record.sk, "list created");
    Ok(Task::from_record(record))
}

/// Point lookup by full key.
pub async fn get_by_key<T: TaskTable>(table: &T, pk: &str, sk: &str) -> TaskboxResult<Task> {
    require_full_key(pk, sk)?;

    debug!(pk = %pk, sk = %sk, "fetching record");
    match table.get(pk, sk).await? {
        Some(record) => Ok(Task::from_record(record)),
        None => Err(TaskboxError::NotFound(format!(
            "no record at pk={pk}, sk={sk}"
        ))),
    }
}

/// All records under one owner key.
///
/// With a `USER#` key this returns the user's lists; with a list's sort key
/// it returns that list's items. An unknown owner key yields an empty
/// vector, not an error.
pub async fn list_children<T: TaskTable>(table: &T, pk: &str) -> TaskboxResult<Vec<Task>> {
    if pk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "parameter 'pk' must not be blank".to_string(),
        ));
    }

    let records = table.query_by_owner(pk).await?;
    debug!(pk = %pk, count = records.len(), "children listed");
    Ok(records.into_iter().map(Task::from_record).collect())
}

/// Create an item under an existing list.
///
/// The item is re-parented at creation: its stored owner key is the list's
/// sort key, and its sort key is a generated bare token.
pub async fn create_item<T: TaskTable>(
    table: &T,
    list_pk: &str,
    list_sk: &str,
    description: Option<&str>,
) -> TaskboxResult<Task> {
    if list_pk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "field 'pk' must not be blank".to_string(),
        ));
    }
    if list_sk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "field 'sk' must not be blank".to_string(),
        ));
    }

    if !table.exists(list_pk, list_sk).await? {
        return Err(TaskboxError::Validation(format!(
            "no list exists with sk={list_sk}"
        )));
    }

    let parent = ParentRef::from_list_sort_key(list_sk);
    let record = TaskRecord::new(
        parent.into_owner_key(),
        keys::new_item_sort_key(),
        description.map(str::to_string),
    );
    table.put(record.clone()).await?;

    info!(pk = %record.pk, sk = %record.sk, "item created");
    Ok(Task::from_record(record))
}

/// Replace a record's description.
///
/// Read-modify-write with a full `put`: two concurrent updates race and the
/// later write wins unconditionally. An absent `description` field in the
/// patch is a validation failure; an empty string is a valid update.
pub async fn update_description<T: TaskTable>(
    table: &T,
    pk: &str,
    sk: &str,
    patch: &DescriptionPatch,
) -> TaskboxResult<Task> {
    if pk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "parameter 'pk' must not be blank".to_string(),
        ));
    }
    if sk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "parameter 'sk' must not be blank".to_string(),
        ));
    }
    let Some(new_description) = patch.description.as_deref() else {
        return Err(TaskboxError::Validation(
            "field 'description' is required".to_string(),
        ));
    };

    let mut record = table
        .get(pk, sk)
        .await?
        .ok_or_else(|| TaskboxError::NotFound(format!("no record at pk={pk}, sk={sk}")))?;

    record.description = Some(new_description.to_string());
    table.put(record.clone()).await?;

    info!(pk = %record.pk, sk = %record.sk, "description updated");
    Ok(Task::from_record(record))
}

/// Delete a record by full key.
///
/// Reports success whether or not the record existed; deleting twice has
/// the same observable outcome both times.
pub async fn delete_item<T: TaskTable>(table: &T, pk: &str, sk: &str) -> TaskboxResult<()> {
    require_full_key(pk, sk)?;

    table.delete(pk, sk).await?;
    info!(pk = %pk, sk = %sk, "record deleted");
    Ok(())
}

/// Point-addressing keys must be non-blank and carry the `#` separator.
fn require_full_key(pk: &str, sk: &str) -> TaskboxResult<()> {
    if pk.trim().is_empty() || !pk.contains('#') {
        return Err(TaskboxError::Validation(
            "parameter 'pk' must be a full key".to_string(),
        ));
    }
    if sk.trim().is_empty() || !sk.contains('#') {
        return Err(TaskboxError::Validation(
            "parameter 'sk' must be a full key".to_string(),
        ));
    }
    Ok(())
}

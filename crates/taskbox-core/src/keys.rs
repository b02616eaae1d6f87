//! Hierarchical key scheme.
//!
//! Two string prefixes carry the whole hierarchy: owner keys are
//! `USER#<id>`, list sort keys are `LIST#<uuid>`, and item sort keys are
//! bare uuids. An item's partition key is its parent list's sort key, which
//! [`ParentRef`] makes explicit.

use uuid::Uuid;

/// Prefix of every top-level owner key.
pub const USER_PREFIX: &str = "USER#";

/// Prefix of every list sort key, and the literal a create-list request
/// must carry before the server assigns the suffix.
pub const LIST_PREFIX: &str = "LIST#";

/// True iff `s` is a well-formed owner key: `USER#` with a non-blank suffix.
pub fn is_owner_key(s: &str) -> bool {
    match s.strip_prefix(USER_PREFIX) {
        Some(suffix) => !suffix.trim().is_empty(),
        None => false,
    }
}

/// True iff `s` is the bare `LIST#` intake literal or a stored list sort key.
pub fn is_list_sort_key(s: &str) -> bool {
    s.starts_with(LIST_PREFIX)
}

/// Generate a fresh list sort key: `LIST#<uuid-v4>`.
///
/// v4 uuids are coordination-free and collision probability is negligible,
/// so concurrent callers never need a sequencer.
pub fn new_list_sort_key() -> String {
    format!("{}{}", LIST_PREFIX, Uuid::new_v4())
}

/// Generate a fresh item sort key: a bare uuid, no prefix.
pub fn new_item_sort_key() -> String {
    Uuid::new_v4().to_string()
}

/// Typed link from a list to its children.
///
/// A list's sort key doubles as the partition key of every item under it.
/// Routing that hop through `ParentRef` keeps the relation visible in
/// signatures instead of hiding it in a string copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef(String);

impl ParentRef {
    /// Wrap a list's sort key as the parent of future items.
    pub fn from_list_sort_key(sk: impl Into<String>) -> Self {
        Self(sk.into())
    }

    /// The owner key an item stored under this parent must carry.
    pub fn as_owner_key(&self) -> &str {
        &self.0
    }

    pub fn into_owner_key(self) -> String {
        self.0
    }
}

//! Tag domain model.
//!
//! A tag is a shared category label. It sits on the inverse side of the
//! image/tag many-to-many association: deleting images never deletes tags.

use serde::{Deserialize, Serialize};

/// Store-generated surrogate key for tags.
pub type TagId = i64;

/// A tag that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    /// Natural lookup key. Uniqueness is assumed by lookups, not enforced
    /// by the schema.
    pub name: String,
}

impl NewTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A persisted tag record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Assigned on first persist; never reused or mutated.
    pub id: TagId,
    pub name: String,
}

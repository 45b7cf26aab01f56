//! Image domain model.
//!
//! # Responsibility
//! - Define the central entity: an image belongs to exactly one user and
//!   references a set of shared tags.
//!
//! # Invariants
//! - `Image::id` is immutable after creation.
//! - An image must reference an existing user at creation.
//! - `tags == None` means "association not loaded", not "no tags".

use crate::model::tag::{Tag, TagId};
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Store-generated surrogate key for images.
pub type ImageId = i64;

/// An image that has not been persisted yet.
///
/// The caller resolves the owning user and the tag references before
/// handing the image to the repository; the repository performs no
/// content validation of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub title: String,
    /// Encoded image payload or file reference. Raw byte handling lives
    /// outside this layer.
    pub image_file: String,
    pub description: Option<String>,
    /// Owning user; must exist at upload time.
    pub user_id: UserId,
    /// Already-persisted tags to associate on upload.
    pub tag_ids: Vec<TagId>,
}

impl NewImage {
    /// Creates a transient image with no description and no tags.
    pub fn new(
        title: impl Into<String>,
        image_file: impl Into<String>,
        user_id: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            image_file: image_file.into(),
            description: None,
            user_id,
            tag_ids: Vec::new(),
        }
    }
}

/// A persisted image record, detached from any unit of work.
///
/// Handing a (possibly modified) record back to
/// `ImageRepository::update_image` merges its scalar state, and its tag set
/// when loaded, into the stored row with the matching id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Assigned on first persist; never reused or mutated.
    pub id: ImageId,
    pub title: String,
    pub image_file: String,
    pub description: Option<String>,
    /// Epoch milliseconds, stamped by the store at insert and not merged
    /// on update.
    pub uploaded_at: i64,
    pub user_id: UserId,
    /// `Some` when the association was loaded (`TagFetch::Load`), `None`
    /// otherwise.
    pub tags: Option<Vec<Tag>>,
}

impl Image {
    /// Returns the loaded tag names, or `None` when tags were not fetched.
    pub fn tag_names(&self) -> Option<Vec<&str>> {
        self.tags
            .as_ref()
            .map(|tags| tags.iter().map(|tag| tag.name.as_str()).collect())
    }
}

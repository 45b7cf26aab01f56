//! Entity model for the image store.
//!
//! # Responsibility
//! - Define canonical data structures for users, profiles, images and tags.
//! - Separate transient (unsaved) shapes from persistent records.
//!
//! # Invariants
//! - Persistent records carry a store-generated id that never changes.
//! - `New*` types never carry an id; the store assigns one on first persist.

pub mod image;
pub mod tag;
pub mod user;

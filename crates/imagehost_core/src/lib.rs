//! Persistence layer for the ImageHost application.
//! This crate is the sole data access path: controllers and services call
//! the repository APIs and never touch the store directly.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::image::{Image, ImageId, NewImage};
pub use model::tag::{NewTag, Tag, TagId};
pub use model::user::{NewUser, NewUserProfile, User, UserId, UserProfile};
pub use repo::image_repo::{ImageRepository, SqliteImageRepository, TagFetch};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

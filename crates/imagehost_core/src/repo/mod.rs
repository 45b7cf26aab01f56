//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the sole persistence API consumed by the excluded
//!   service/controller layer.
//! - Isolate SQL details behind use-case oriented contracts.
//!
//! # Invariants
//! - Every write operation is one unit of work: a transaction opened,
//!   committed on success, rolled back on every other exit path.
//! - No two operations share a session; no operation spans calls.
//! - Persistence faults are surfaced as typed results, never swallowed.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::image::ImageId;
use crate::model::tag::TagId;
use crate::model::user::UserId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod image_repo;
pub mod tag_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors shared by all repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, including rejected writes. The
    /// transaction that hit it has been rolled back.
    Db(DbError),
    /// Id-based image lookup or write matched zero rows.
    ImageNotFound(ImageId),
    /// Id-based user lookup or write matched zero rows.
    UserNotFound(UserId),
    /// A referenced tag id does not exist.
    TagNotFound(TagId),
    /// More than one image shares the looked-up title.
    AmbiguousTitle(String),
    /// More than one tag shares the looked-up name.
    AmbiguousTagName(String),
    /// Connection schema is not at the version this binary supports.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ImageNotFound(id) => write!(f, "image not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::AmbiguousTitle(title) => {
                write!(f, "more than one image titled `{title}`")
            }
            Self::AmbiguousTagName(name) => {
                write!(f, "more than one tag named `{name}`")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match supported {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections whose schema has not been migrated to the version
/// this binary was built against.
pub(crate) fn ensure_schema_current(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

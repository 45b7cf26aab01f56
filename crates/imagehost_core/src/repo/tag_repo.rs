//! Tag repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create_tag` runs in its own transaction like every other write.
//! - `find_tag` treats absence as a signal and a duplicate name as a
//!   deterministic ambiguity fault.

use crate::model::tag::{NewTag, Tag, TagId};
use crate::repo::{ensure_schema_current, RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, Row, TransactionBehavior};

/// Repository interface for tag persistence.
pub trait TagRepository {
    /// Persists a transient tag and returns its generated id.
    ///
    /// # Errors
    /// - `Db` when the store rejects the write; the transaction has been
    ///   rolled back.
    fn create_tag(&mut self, new_tag: &NewTag) -> RepoResult<TagId>;

    /// Exact-match lookup by name.
    ///
    /// `Ok(None)` when no tag has the name; `AmbiguousTagName` when more
    /// than one does.
    fn find_tag(&self, name: &str) -> RepoResult<Option<Tag>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&mut self, new_tag: &NewTag) -> RepoResult<TagId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO tags (name) VALUES (?1);",
            [new_tag.name.as_str()],
        )?;
        let tag_id = tx.last_insert_rowid();

        tx.commit()?;
        info!("event=tag_create module=repo status=ok tag_id={tag_id}");
        Ok(tag_id)
    }

    fn find_tag(&self, name: &str) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags WHERE name = ?1 LIMIT 2;")?;
        let mut rows = stmt.query([name])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let tag = parse_tag_row(row)?;
        if rows.next()?.is_some() {
            return Err(RepoError::AmbiguousTagName(name.to_string()));
        }

        Ok(Some(tag))
    }
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

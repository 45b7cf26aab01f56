//! Image repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide upload/list/lookup/update/delete over the `images` table and
//!   its `images_tags` association rows.
//!
//! # Invariants
//! - Each write runs in one immediate transaction; an early return rolls
//!   back and releases the session.
//! - Deleting an image removes its association rows, never tag rows.
//! - Tag associations are only read or written when the caller asks for
//!   them; there is no implicit lazy loading.

use crate::model::image::{Image, ImageId, NewImage};
use crate::model::tag::Tag;
use crate::repo::{ensure_schema_current, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const IMAGE_SELECT_SQL: &str = "SELECT
    id,
    title,
    image_file,
    description,
    uploaded_at,
    user_id
FROM images";

/// Caller-specified fetch mode for the image/tag association.
///
/// Replaces implicit lazy proxies: the caller states up front whether a
/// loaded image carries its tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFetch {
    /// Populate `Image::tags` with the associated tag records.
    Load,
    /// Leave `Image::tags` as `None`.
    Skip,
}

/// Repository interface for image persistence.
///
/// Each call opens its own unit of work against the borrowed connection;
/// calls never compose into a larger caller-controlled transaction.
pub trait ImageRepository {
    /// Persists a transient image and its tag associations.
    ///
    /// # Errors
    /// - `UserNotFound` when the owning user does not exist.
    /// - `TagNotFound` when a referenced tag id does not exist.
    /// - `Db` when the store rejects the write; the transaction has been
    ///   rolled back and no rows remain.
    fn upload_image(&mut self, new_image: &NewImage) -> RepoResult<ImageId>;

    /// Returns every image row in store order, tags not loaded.
    fn list_images(&self) -> RepoResult<Vec<Image>>;

    /// Exact-match lookup by title.
    ///
    /// Absence is a signal (`Ok(None)`), not a fault. A second matching
    /// row is reported as `AmbiguousTitle` instead of silently picking one.
    fn get_image_by_title(&self, title: &str, fetch: TagFetch) -> RepoResult<Option<Image>>;

    /// Exact-match lookup by primary key.
    ///
    /// Unlike the title lookup this does not tolerate absence: a missing
    /// id is `ImageNotFound`.
    fn get_image(&self, id: ImageId, fetch: TagFetch) -> RepoResult<Image>;

    /// Merges a detached record into the stored row with the matching id.
    ///
    /// Scalar columns are always written; the tag set is replaced only
    /// when the record carries one (`tags == Some`). `uploaded_at` is the
    /// insert stamp and is never merged.
    fn update_image(&mut self, image: &Image) -> RepoResult<()>;

    /// Deletes an image and its association rows.
    ///
    /// A missing id is `ImageNotFound` rather than a silent no-op, so
    /// caller bugs surface.
    fn delete_image(&mut self, id: ImageId) -> RepoResult<()>;
}

/// SQLite-backed image repository.
pub struct SqliteImageRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteImageRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        Ok(Self { conn })
    }
}

impl ImageRepository for SqliteImageRepository<'_> {
    fn upload_image(&mut self, new_image: &NewImage) -> RepoResult<ImageId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owner_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [new_image.user_id],
            |row| row.get(0),
        )?;
        if owner_exists == 0 {
            return Err(RepoError::UserNotFound(new_image.user_id));
        }

        tx.execute(
            "INSERT INTO images (title, image_file, description, user_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                new_image.title.as_str(),
                new_image.image_file.as_str(),
                new_image.description.as_deref(),
                new_image.user_id,
            ],
        )?;
        let image_id = tx.last_insert_rowid();

        for &tag_id in &new_image.tag_ids {
            let changed = tx.execute(
                "INSERT INTO images_tags (image_id, tag_id)
                 SELECT ?1, id FROM tags WHERE id = ?2;",
                params![image_id, tag_id],
            )?;
            if changed == 0 {
                return Err(RepoError::TagNotFound(tag_id));
            }
        }

        tx.commit()?;
        info!(
            "event=image_upload module=repo status=ok image_id={image_id} user_id={} tag_count={}",
            new_image.user_id,
            new_image.tag_ids.len()
        );
        Ok(image_id)
    }

    fn list_images(&self) -> RepoResult<Vec<Image>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IMAGE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut images = Vec::new();
        while let Some(row) = rows.next()? {
            images.push(parse_image_row(row)?);
        }
        Ok(images)
    }

    fn get_image_by_title(&self, title: &str, fetch: TagFetch) -> RepoResult<Option<Image>> {
        // LIMIT 2 so a violated uniqueness assumption is detected instead
        // of returning whichever row the store yields first.
        let mut stmt = self
            .conn
            .prepare(&format!("{IMAGE_SELECT_SQL} WHERE title = ?1 LIMIT 2;"))?;
        let mut rows = stmt.query([title])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut image = parse_image_row(row)?;
        if rows.next()?.is_some() {
            return Err(RepoError::AmbiguousTitle(title.to_string()));
        }

        if fetch == TagFetch::Load {
            image.tags = Some(load_tags_for_image(self.conn, image.id)?);
        }
        Ok(Some(image))
    }

    fn get_image(&self, id: ImageId, fetch: TagFetch) -> RepoResult<Image> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IMAGE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        let Some(row) = rows.next()? else {
            return Err(RepoError::ImageNotFound(id));
        };
        let mut image = parse_image_row(row)?;

        if fetch == TagFetch::Load {
            image.tags = Some(load_tags_for_image(self.conn, image.id)?);
        }
        Ok(image)
    }

    fn update_image(&mut self, image: &Image) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE images
             SET
                title = ?1,
                image_file = ?2,
                description = ?3,
                user_id = ?4
             WHERE id = ?5;",
            params![
                image.title.as_str(),
                image.image_file.as_str(),
                image.description.as_deref(),
                image.user_id,
                image.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::ImageNotFound(image.id));
        }

        if let Some(tags) = image.tags.as_ref() {
            tx.execute("DELETE FROM images_tags WHERE image_id = ?1;", [image.id])?;
            for tag in tags {
                let linked = tx.execute(
                    "INSERT INTO images_tags (image_id, tag_id)
                     SELECT ?1, id FROM tags WHERE id = ?2;",
                    params![image.id, tag.id],
                )?;
                if linked == 0 {
                    return Err(RepoError::TagNotFound(tag.id));
                }
            }
        }

        tx.commit()?;
        info!(
            "event=image_update module=repo status=ok image_id={}",
            image.id
        );
        Ok(())
    }

    fn delete_image(&mut self, id: ImageId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM images_tags WHERE image_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM images WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::ImageNotFound(id));
        }

        tx.commit()?;
        info!("event=image_delete module=repo status=ok image_id={id}");
        Ok(())
    }
}

fn parse_image_row(row: &Row<'_>) -> RepoResult<Image> {
    Ok(Image {
        id: row.get("id")?,
        title: row.get("title")?,
        image_file: row.get("image_file")?,
        description: row.get("description")?,
        uploaded_at: row.get("uploaded_at")?,
        user_id: row.get("user_id")?,
        tags: None,
    })
}

fn load_tags_for_image(conn: &Connection, image_id: ImageId) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM images_tags it
         INNER JOIN tags t ON t.id = it.tag_id
         WHERE it.image_id = ?1
         ORDER BY t.id ASC;",
    )?;
    let mut rows = stmt.query([image_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get("id")?,
            name: row.get("name")?,
        });
    }
    Ok(tags)
}

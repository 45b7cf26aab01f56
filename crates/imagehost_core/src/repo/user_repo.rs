//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Register accounts (user plus owned profile in one transaction).
//! - Run the explicit delete cascade for the user aggregate.
//!
//! # Invariants
//! - Registering persists the profile and the user atomically.
//! - Deleting a user removes its images, their association rows and the
//!   owned profile in the same transaction; tag rows are never touched.

use crate::model::user::{NewUser, User, UserId, UserProfile};
use crate::repo::{ensure_schema_current, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    u.id,
    u.username,
    u.password,
    p.id AS profile_id,
    p.full_name,
    p.email_address,
    p.mobile_number
FROM users u
INNER JOIN user_profile p ON p.id = u.profile_id";

/// Repository interface for account persistence.
pub trait UserRepository {
    /// Persists a transient user together with its owned profile.
    fn register_user(&mut self, new_user: &NewUser) -> RepoResult<UserId>;

    /// Primary-key lookup; the profile is loaded eagerly.
    ///
    /// A missing id is `UserNotFound`.
    fn get_user(&self, id: UserId) -> RepoResult<User>;

    /// Credential lookup used by the login path.
    ///
    /// `Ok(None)` when no account matches; absence is not a fault.
    fn check_user(&self, username: &str, password: &str) -> RepoResult<Option<User>>;

    /// Deletes a user and cascades to everything it owns.
    ///
    /// Order inside the transaction: association rows of the user's
    /// images, the image rows, the user row, the profile row.
    fn delete_user(&mut self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn register_user(&mut self, new_user: &NewUser) -> RepoResult<UserId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO user_profile (full_name, email_address, mobile_number)
             VALUES (?1, ?2, ?3);",
            params![
                new_user.profile.full_name.as_deref(),
                new_user.profile.email_address.as_deref(),
                new_user.profile.mobile_number.as_deref(),
            ],
        )?;
        let profile_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO users (username, password, profile_id)
             VALUES (?1, ?2, ?3);",
            params![
                new_user.username.as_str(),
                new_user.password.as_str(),
                profile_id,
            ],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.commit()?;
        info!("event=user_register module=repo status=ok user_id={user_id}");
        Ok(user_id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<User> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE u.id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        let Some(row) = rows.next()? else {
            return Err(RepoError::UserNotFound(id));
        };
        parse_user_row(row)
    }

    fn check_user(&self, username: &str, password: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL} WHERE u.username = ?1 AND u.password = ?2 LIMIT 1;"
        ))?;
        let mut rows = stmt.query([username, password])?;

        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_user(&mut self, id: UserId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let profile_id: Option<i64> = tx
            .query_row("SELECT profile_id FROM users WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(profile_id) = profile_id else {
            return Err(RepoError::UserNotFound(id));
        };

        tx.execute(
            "DELETE FROM images_tags WHERE image_id IN
             (SELECT id FROM images WHERE user_id = ?1);",
            [id],
        )?;
        let image_count = tx.execute("DELETE FROM images WHERE user_id = ?1;", [id])?;
        tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        tx.execute("DELETE FROM user_profile WHERE id = ?1;", [profile_id])?;

        tx.commit()?;
        info!(
            "event=user_delete module=repo status=ok user_id={id} cascaded_images={image_count}"
        );
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password: row.get("password")?,
        profile: UserProfile {
            id: row.get("profile_id")?,
            full_name: row.get("full_name")?,
            email_address: row.get("email_address")?,
            mobile_number: row.get("mobile_number")?,
        },
    })
}

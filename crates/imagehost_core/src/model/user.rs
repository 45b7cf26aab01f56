//! User and profile domain models.
//!
//! # Responsibility
//! - Define the account aggregate: a user exclusively owns one profile and
//!   many images.
//!
//! # Invariants
//! - `User::id` is immutable after creation.
//! - A profile's lifetime is bound to its owning user; registering a user
//!   persists its profile, deleting the user deletes it.

use serde::{Deserialize, Serialize};

/// Store-generated surrogate key for users.
pub type UserId = i64;

/// Profile attributes for a user that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserProfile {
    pub full_name: Option<String>,
    pub email_address: Option<String>,
    pub mobile_number: Option<String>,
}

/// An account that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    /// Owned 1:1; persisted together with the user in one transaction.
    pub profile: NewUserProfile,
}

impl NewUser {
    /// Creates a transient user with an empty profile.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            profile: NewUserProfile::default(),
        }
    }
}

/// A persisted profile record, loaded eagerly with its owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: Option<String>,
    pub email_address: Option<String>,
    pub mobile_number: Option<String>,
}

/// A persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned on first persist; never reused or mutated.
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub profile: UserProfile,
}

//! User documents.

use quire_core::roles::Role;
use serde::{Deserialize, Serialize};

use crate::document::{DocKind, TypedDocument};

/// Prefix shared by all user document keys.
pub const USER_KEY_PREFIX: &str = "user-";

/// Store key for the user with `email` (case-insensitive).
pub fn user_key(email: &str) -> String {
    format!("{USER_KEY_PREFIX}{}", email.to_lowercase())
}

/// Stored body of a user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub role: Role,
}

impl TypedDocument for UserRecord {
    const KIND: DocKind = DocKind::User;
}

/// A user as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn from_record(id: impl Into<String>, record: UserRecord) -> Self {
        Self {
            id: id.into(),
            email: record.email,
            role: record.role,
        }
    }
}

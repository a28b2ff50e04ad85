//! Singleton documents.

use serde::{Deserialize, Serialize};

use crate::document::{DocKind, TypedDocument};

/// Key of the document holding the session-check secret.
pub const LOGIN_KEY_ID: &str = "login-key";

/// Key of the marker whose creation decides the first admin.
pub const FIRST_USER_ID: &str = "first-user";

/// Server-side secret used to derive session check values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginKeyRecord {
    pub key: String,
}

impl TypedDocument for LoginKeyRecord {
    const KIND: DocKind = DocKind::LoginKey;
}

/// Written exactly once, by whichever first login creates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstUserMarker {
    pub email: String,
}

impl TypedDocument for FirstUserMarker {
    const KIND: DocKind = DocKind::FirstUser;
}

//! Document kind tags.
//!
//! All documents share one key space, so each stored body carries a
//! `"type"` discriminant. The tag is always written from the Rust type being
//! stored and checked against the expected kind on every read.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DbError;

/// Name of the discriminant field inside every stored body.
pub const TYPE_FIELD: &str = "type";

/// The kinds of document kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Article,
    HistoryBody,
    User,
    LoginKey,
    FirstUser,
}

impl DocKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Article => "article",
            DocKind::HistoryBody => "history_body",
            DocKind::User => "user",
            DocKind::LoginKey => "login_key",
            DocKind::FirstUser => "first_user",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model that is persisted as its own document kind.
pub trait TypedDocument: Serialize + DeserializeOwned {
    const KIND: DocKind;
}

/// Read the kind tag of a stored body, if any.
pub fn kind_of(body: &Value) -> Option<&str> {
    body.get(TYPE_FIELD).and_then(Value::as_str)
}

/// Serialize `doc` and stamp it with its kind tag.
pub fn encode<T: TypedDocument>(doc: &T) -> Result<Value, DbError> {
    let mut value = serde_json::to_value(doc)?;
    let Some(map) = value.as_object_mut() else {
        return Err(DbError::Serialization(serde::ser::Error::custom(format!(
            "{} documents must serialize to a JSON object",
            T::KIND
        ))));
    };
    map.insert(TYPE_FIELD.into(), Value::String(T::KIND.as_str().into()));
    Ok(value)
}

/// Check the kind tag of a body read from `key` and deserialize it.
pub fn decode<T: TypedDocument>(key: &str, body: Value) -> Result<T, DbError> {
    let found = kind_of(&body).unwrap_or_default();
    if found != T::KIND.as_str() {
        return Err(DbError::TypeMismatch {
            key: key.to_string(),
            expected: T::KIND,
            found: found.to_string(),
        });
    }
    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl TypedDocument for Note {
        const KIND: DocKind = DocKind::HistoryBody;
    }

    #[test]
    fn encode_stamps_the_kind() {
        let body = encode(&Note { text: "hi".into() }).unwrap();
        assert_eq!(body, json!({ "type": "history_body", "text": "hi" }));
    }

    #[test]
    fn decode_accepts_matching_kind() {
        let note: Note = decode("n1", json!({ "type": "history_body", "text": "hi" })).unwrap();
        assert_eq!(note.text, "hi");
    }

    #[test]
    fn decode_rejects_other_kinds() {
        let err = decode::<Note>("n1", json!({ "type": "user", "text": "hi" })).unwrap_err();
        assert_matches!(
            err,
            DbError::TypeMismatch { ref key, expected: DocKind::HistoryBody, ref found }
                if key == "n1" && found == "user"
        );
    }

    #[test]
    fn decode_rejects_untagged_bodies() {
        let err = decode::<Note>("n1", json!({ "text": "hi" })).unwrap_err();
        assert_matches!(err, DbError::TypeMismatch { ref found, .. } if found.is_empty());
    }
}

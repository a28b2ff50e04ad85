//! The document store adapter.
//!
//! Every operation in Quire goes through [`DocumentStore`]: point reads,
//! compare-and-swap writes, id generation, and range scans over a couple of
//! fixed secondary indexes. Concurrency control lives entirely in
//! [`DocumentStore::put`]; callers never lock anything in-process.
//!
//! Implementations:
//! - [`InMemoryStore`] -- a mutex-guarded map for tests and local runs.
//! - [`PgDocumentStore`] -- one PostgreSQL `documents` table via sqlx.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use quire_core::types::Revision;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{decode, kind_of, DocKind};
use crate::error::DbError;
use crate::models::article::{ArticleRecord, ArticleSummary};
use crate::models::user::UserRecord;

/// Upper bound for prefix range scans (sorts after any realistic key).
pub const HIGH_SENTINEL: &str = "\u{fff0}";

/// Attempts a compare-and-swap loop makes before giving up.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// A document as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub revision: Revision,
    pub body: Value,
}

/// One row of a range scan.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    /// Key of the document that produced the row.
    pub id: String,
    /// Index key the row is sorted by.
    pub key: String,
    pub value: Value,
}

/// The secondary indexes a store can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// Users keyed by email; value is the role name.
    UsersByEmail,
    /// Articles keyed by title; value is an [`ArticleSummary`].
    ArticlesByTitle,
}

impl Index {
    /// Kind of document this index draws rows from.
    pub fn kind(self) -> DocKind {
        match self {
            Index::UsersByEmail => DocKind::User,
            Index::ArticlesByTitle => DocKind::Article,
        }
    }

    /// Compute the `(key, value)` row for a stored body, if it belongs here.
    pub fn emit(self, id: &str, body: &Value) -> Option<(String, Value)> {
        if kind_of(body) != Some(self.kind().as_str()) {
            return None;
        }

        let row = match self {
            Index::UsersByEmail => decode::<UserRecord>(id, body.clone())
                .map(|user| (user.email, Value::String(user.role.as_str().into()))),
            Index::ArticlesByTitle => {
                decode::<ArticleRecord>(id, body.clone()).and_then(|article| {
                    let summary = ArticleSummary {
                        id: id.to_string(),
                        created: article
                            .history
                            .first()
                            .map_or(article.last_modified, |entry| entry.timestamp),
                        modified: article.last_modified,
                        is_public: article.is_public,
                        title: article.title,
                    };
                    Ok((summary.title.clone(), serde_json::to_value(&summary)?))
                })
            }
        };

        match row {
            Ok(row) => Some(row),
            Err(err) => {
                tracing::warn!(doc_id = %id, index = ?self, error = %err, "Skipping undecodable document");
                None
            }
        }
    }
}

/// Revisioned key/value document storage with compare-and-swap writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup by key.
    async fn get(&self, key: &str) -> Result<Option<StoredDocument>, DbError>;

    /// Write `body` under `key` if the stored revision still equals `prior`.
    ///
    /// `prior = None` means "create only": the write succeeds only if the key
    /// does not exist. Returns the new revision, or `None` if the write was
    /// rejected because another writer got there first.
    async fn put(
        &self,
        key: &str,
        prior: Option<&str>,
        body: Value,
    ) -> Result<Option<Revision>, DbError>;

    /// Scan `index` for keys in `[start, end)`, ordered by key then id.
    async fn range(&self, index: Index, start: &str, end: &str)
        -> Result<Vec<IndexRow>, DbError>;

    /// Verify the backing storage is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Generate a globally unique document id.
    async fn new_id(&self) -> Result<String, DbError> {
        Ok(Uuid::new_v4().simple().to_string())
    }
}

/// Mint the revision that follows `prior`.
///
/// Tokens look like `<generation>-<uuid>`; the random suffix keeps them from
/// ever repeating even if two writers race on the same generation.
pub fn next_revision(prior: Option<&str>) -> Revision {
    let generation = prior
        .and_then(|rev| rev.split_once('-'))
        .and_then(|(generation, _)| generation.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;
    format!("{generation}-{}", Uuid::new_v4().simple())
}

/// Build sorted index rows for `[start, end)` from `(id, body)` pairs.
pub(crate) fn collect_rows<'a>(
    index: Index,
    docs: impl IntoIterator<Item = (&'a str, &'a Value)>,
    start: &str,
    end: &str,
) -> Vec<IndexRow> {
    let mut rows: Vec<IndexRow> = docs
        .into_iter()
        .filter_map(|(id, body)| {
            let (key, value) = index.emit(id, body)?;
            (key.as_str() >= start && key.as_str() < end).then(|| IndexRow {
                id: id.to_string(),
                key,
                value,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.id.cmp(&b.id)));
    rows
}

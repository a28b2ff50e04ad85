//! Article, history and update DTO models.

use chrono::Utc;
use quire_core::article::{is_always_public, INDEX_ARTICLE_ID, PLACEHOLDER_MARKDOWN};
use quire_core::types::{Revision, Timestamp};
use serde::{Deserialize, Serialize};

use crate::document::{DocKind, TypedDocument};

/// Snapshot reference to a superseded revision of an article.
///
/// The markdown itself lives in a separate [`HistoryBodyRecord`] so that the
/// article document stays small on the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: Timestamp,
    pub title: String,
    pub author: String,
    pub history_body_id: String,
}

/// Stored body of an article document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub author: String,
    pub markdown: String,
    pub last_modified: Timestamp,
    pub is_public: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl TypedDocument for ArticleRecord {
    const KIND: DocKind = DocKind::Article;
}

/// An article together with its id and current revision.
///
/// An empty `revision` marks an article that has never been stored.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: String,
    pub revision: Revision,
    pub title: String,
    pub author: String,
    pub markdown: String,
    pub last_modified: Timestamp,
    pub is_public: bool,
    pub history: Vec<HistoryEntry>,
}

impl Article {
    /// The in-memory stand-in for an id nobody has written yet.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            revision: Revision::new(),
            title: id.to_string(),
            author: String::new(),
            markdown: PLACEHOLDER_MARKDOWN.to_string(),
            last_modified: Utc::now(),
            is_public: is_always_public(id),
            history: Vec::new(),
        }
    }

    pub fn from_record(id: &str, revision: Revision, record: ArticleRecord) -> Self {
        Self {
            id: id.to_string(),
            revision,
            title: record.title,
            author: record.author,
            markdown: record.markdown,
            last_modified: record.last_modified,
            is_public: record.is_public || is_always_public(id),
            history: record.history,
        }
    }

    /// Whether this article has been stored at least once.
    pub fn exists(&self) -> bool {
        !self.revision.is_empty()
    }

    pub fn is_index(&self) -> bool {
        self.id == INDEX_ARTICLE_ID
    }

    /// History entry describing this revision, pointing at its saved body.
    pub fn snapshot(&self, history_body_id: String) -> HistoryEntry {
        HistoryEntry {
            timestamp: self.last_modified,
            title: self.title.clone(),
            author: self.author.clone(),
            history_body_id,
        }
    }
}

/// Stored body of a history snapshot. Never modified once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryBodyRecord {
    pub markdown: String,
}

impl TypedDocument for HistoryBodyRecord {
    const KIND: DocKind = DocKind::HistoryBody;
}

/// A history snapshot as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBody {
    pub id: String,
    pub markdown: String,
}

/// An edit submitted against a known revision.
#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub id: String,
    /// Revision the editor started from; empty when creating the article.
    pub expected_revision: Revision,
    pub title: String,
    pub author: String,
    pub markdown: String,
    pub requested_public: bool,
}

/// Result of [`ArticleRepo::update`](crate::repositories::ArticleRepo::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The edit was stored under a new revision.
    Updated { revision: Revision },
    /// The article changed since `expected_revision`; nothing was written.
    Conflict,
}

/// Row of the admin article listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    /// Date of the oldest known revision.
    pub created: Timestamp,
    /// Date of the current revision.
    pub modified: Timestamp,
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_unsaved_and_titled_by_id() {
        let article = Article::placeholder("ideas");
        assert!(!article.exists());
        assert_eq!(article.title, "ideas");
        assert_eq!(article.markdown, PLACEHOLDER_MARKDOWN);
        assert!(article.history.is_empty());
        assert!(!article.is_public);
    }

    #[test]
    fn placeholder_index_is_public() {
        assert!(Article::placeholder("index").is_public);
    }

    #[test]
    fn stored_index_is_public_even_if_record_says_otherwise() {
        let record = ArticleRecord {
            title: "Home".into(),
            author: "ann@example.com".into(),
            markdown: "hi".into(),
            last_modified: Utc::now(),
            is_public: false,
            history: Vec::new(),
        };
        let article = Article::from_record("index", "1-abc".into(), record);
        assert!(article.is_public);
        assert!(article.exists());
    }
}

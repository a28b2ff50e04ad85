//! Repository for article documents and their history bodies.

use async_trait::async_trait;
use chrono::Utc;
use quire_core::article::effective_visibility;
use quire_core::markdown::TitleResolver;

use crate::document::{decode, encode};
use crate::error::DbError;
use crate::models::article::{
    Article, ArticleRecord, ArticleSummary, ArticleUpdate, HistoryBody, HistoryBodyRecord,
    UpdateOutcome,
};
use crate::store::{DocumentStore, Index, HIGH_SENTINEL, MAX_WRITE_ATTEMPTS};

/// Provides load/update operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Load an article by id.
    ///
    /// An id nobody has written yet reads as [`Article::placeholder`]; the
    /// placeholder is never persisted by this call.
    pub async fn load(store: &dyn DocumentStore, id: &str) -> Result<Article, DbError> {
        match store.get(id).await? {
            Some(doc) => {
                let record: ArticleRecord = decode(id, doc.body)?;
                Ok(Article::from_record(id, doc.revision, record))
            }
            None => Ok(Article::placeholder(id)),
        }
    }

    /// Apply an edit made against `input.expected_revision`.
    ///
    /// When the stored revision no longer matches, nothing is written and
    /// [`UpdateOutcome::Conflict`] is returned. Otherwise the superseded
    /// markdown is saved as a history body, a history entry is appended, and
    /// the article is written with a compare-and-swap. A lost race restarts
    /// from the load; after [`MAX_WRITE_ATTEMPTS`] lost races the update is
    /// reported as a conflict.
    pub async fn update(
        store: &dyn DocumentStore,
        input: &ArticleUpdate,
    ) -> Result<UpdateOutcome, DbError> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let current = Self::load(store, &input.id).await?;
            if current.revision != input.expected_revision {
                tracing::warn!(
                    article_id = %input.id,
                    expected = %input.expected_revision,
                    current = %current.revision,
                    "Rejected stale article update",
                );
                return Ok(UpdateOutcome::Conflict);
            }

            let snapshot = if current.exists() {
                let body_id = Self::save_history_body(store, &current.markdown).await?;
                Some(current.snapshot(body_id))
            } else {
                None
            };
            let prior = current.exists().then(|| current.revision.clone());

            let mut history = current.history;
            history.extend(snapshot);

            let record = ArticleRecord {
                title: input.title.clone(),
                author: input.author.clone(),
                markdown: input.markdown.clone(),
                last_modified: Utc::now(),
                is_public: effective_visibility(&input.id, input.requested_public),
                history,
            };

            match store.put(&input.id, prior.as_deref(), encode(&record)?).await? {
                Some(revision) => {
                    tracing::info!(
                        article_id = %input.id,
                        revision = %revision,
                        author = %input.author,
                        "Article updated",
                    );
                    return Ok(UpdateOutcome::Updated { revision });
                }
                None => {
                    tracing::debug!(article_id = %input.id, attempt, "Article write lost a race, retrying");
                }
            }
        }

        tracing::warn!(
            article_id = %input.id,
            attempts = MAX_WRITE_ATTEMPTS,
            "Giving up on contended article update",
        );
        Ok(UpdateOutcome::Conflict)
    }

    /// Persist `markdown` as a new, immutable history body and return its id.
    pub async fn save_history_body(
        store: &dyn DocumentStore,
        markdown: &str,
    ) -> Result<String, DbError> {
        let body = encode(&HistoryBodyRecord {
            markdown: markdown.to_string(),
        })?;

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let id = store.new_id().await?;
            if store.put(&id, None, body.clone()).await?.is_some() {
                return Ok(id);
            }
        }

        Err(DbError::RetriesExhausted {
            key: "history body".into(),
            attempts: MAX_WRITE_ATTEMPTS,
        })
    }

    /// Fetch a saved history body. Returns `None` if no document has the id.
    pub async fn load_history_body(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<HistoryBody>, DbError> {
        let Some(doc) = store.get(id).await? else {
            return Ok(None);
        };
        let record: HistoryBodyRecord = decode(id, doc.body)?;
        Ok(Some(HistoryBody {
            id: doc.id,
            markdown: record.markdown,
        }))
    }

    /// List every stored article ordered by title.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<ArticleSummary>, DbError> {
        store
            .range(Index::ArticlesByTitle, "", HIGH_SENTINEL)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row.value).map_err(DbError::from))
            .collect()
    }
}

/// Resolves `ref:` link targets to the titles of the referenced articles.
///
/// Missing articles resolve to their id (the placeholder title).
pub struct ArticleTitles<'a>(pub &'a dyn DocumentStore);

#[async_trait]
impl<'a> TitleResolver for ArticleTitles<'a> {
    type Error = DbError;

    async fn resolve_title(&self, id: &str) -> Result<String, DbError> {
        Ok(ArticleRepo::load(self.0, id).await?.title)
    }
}

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use quire_core::types::Revision;
use serde_json::Value;

use super::{collect_rows, next_revision, DocumentStore, Index, IndexRow, StoredDocument};
use crate::error::DbError;

/// A [`DocumentStore`] held entirely in memory.
///
/// Each operation takes the lock once and releases it before returning, so
/// `put` is atomic with respect to other calls exactly like the database
/// backend's conditional update.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    docs: Mutex<BTreeMap<String, StoredDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredDocument>> {
        // A poisoned map is still consistent: every mutation is a single insert.
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredDocument>, DbError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        prior: Option<&str>,
        body: Value,
    ) -> Result<Option<Revision>, DbError> {
        let mut docs = self.lock();

        let current = docs.get(key).map(|doc| doc.revision.as_str());
        if current != prior {
            return Ok(None);
        }

        let revision = next_revision(prior);
        docs.insert(
            key.to_string(),
            StoredDocument {
                id: key.to_string(),
                revision: revision.clone(),
                body,
            },
        );
        Ok(Some(revision))
    }

    async fn range(
        &self,
        index: Index,
        start: &str,
        end: &str,
    ) -> Result<Vec<IndexRow>, DbError> {
        let docs = self.lock();
        Ok(collect_rows(
            index,
            docs.values().map(|doc| (doc.id.as_str(), &doc.body)),
            start,
            end,
        ))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

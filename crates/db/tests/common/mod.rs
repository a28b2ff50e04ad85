//! Store wrappers that inject contention into repository tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use quire_core::types::Revision;
use quire_db::store::{DocumentStore, InMemoryStore, Index, IndexRow, StoredDocument};
use quire_db::DbError;
use serde_json::Value;

/// Rejects every write to `key` as if another writer always got there first.
/// Writes to other keys go through to the inner store.
pub struct ContendedStore {
    pub inner: InMemoryStore,
    pub key: String,
    pub rejected: AtomicU32,
}

impl ContendedStore {
    pub fn new(key: &str) -> Self {
        Self {
            inner: InMemoryStore::new(),
            key: key.to_string(),
            rejected: AtomicU32::new(0),
        }
    }

    pub fn rejected(&self) -> u32 {
        self.rejected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for ContendedStore {
    async fn get(&self, key: &str) -> Result<Option<StoredDocument>, DbError> {
        self.inner.get(key).await
    }

    async fn put(
        &self,
        key: &str,
        prior: Option<&str>,
        body: Value,
    ) -> Result<Option<Revision>, DbError> {
        if key == self.key {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        }
        self.inner.put(key, prior, body).await
    }

    async fn range(&self, index: Index, start: &str, end: &str) -> Result<Vec<IndexRow>, DbError> {
        self.inner.range(index, start, end).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.inner.ping().await
    }
}

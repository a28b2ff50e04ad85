use async_trait::async_trait;
use quire_core::types::Revision;
use serde_json::Value;

use super::{collect_rows, next_revision, DocumentStore, Index, IndexRow, StoredDocument};
use crate::error::DbError;
use crate::DbPool;

/// A [`DocumentStore`] backed by the PostgreSQL `documents` table.
///
/// Compare-and-swap is a conditional statement: `INSERT ... ON CONFLICT DO
/// NOTHING` for create-only writes and `UPDATE ... WHERE rev = $old` for
/// updates. Zero affected rows means another writer won.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<StoredDocument>, DbError> {
        let row: Option<(String, String, Value)> =
            sqlx::query_as("SELECT id, rev, body FROM documents WHERE id = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, revision, body)| StoredDocument { id, revision, body }))
    }

    async fn put(
        &self,
        key: &str,
        prior: Option<&str>,
        body: Value,
    ) -> Result<Option<Revision>, DbError> {
        let revision = next_revision(prior);

        let result = match prior {
            None => {
                sqlx::query(
                    "INSERT INTO documents (id, rev, body)
                     VALUES ($1, $2, $3)
                     ON CONFLICT (id) DO NOTHING",
                )
                .bind(key)
                .bind(&revision)
                .bind(&body)
                .execute(&self.pool)
                .await?
            }
            Some(prior) => {
                sqlx::query(
                    "UPDATE documents SET rev = $2, body = $3, updated_at = NOW()
                     WHERE id = $1 AND rev = $4",
                )
                .bind(key)
                .bind(&revision)
                .bind(&body)
                .bind(prior)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 1 {
            Ok(Some(revision))
        } else {
            tracing::debug!(doc_id = %key, "Conditional write rejected");
            Ok(None)
        }
    }

    async fn range(
        &self,
        index: Index,
        start: &str,
        end: &str,
    ) -> Result<Vec<IndexRow>, DbError> {
        let docs: Vec<(String, Value)> =
            sqlx::query_as("SELECT id, body FROM documents WHERE body->>'type' = $1")
                .bind(index.kind().as_str())
                .fetch_all(&self.pool)
                .await?;

        Ok(collect_rows(
            index,
            docs.iter().map(|(id, body)| (id.as_str(), body)),
            start,
            end,
        ))
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

//! Repository for the server-wide session secret.

use quire_core::session::generate_secret;

use crate::document::{decode, encode};
use crate::error::DbError;
use crate::models::system::{LoginKeyRecord, LOGIN_KEY_ID};
use crate::store::{DocumentStore, MAX_WRITE_ATTEMPTS};

pub struct LoginKeyRepo;

impl LoginKeyRepo {
    /// Return the persisted login key, generating it on first use.
    ///
    /// Concurrent first callers race on a create-only write; the losers read
    /// back the winner's key so every caller sees the same secret.
    pub async fn load_or_create(store: &dyn DocumentStore) -> Result<String, DbError> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if let Some(doc) = store.get(LOGIN_KEY_ID).await? {
                let record: LoginKeyRecord = decode(LOGIN_KEY_ID, doc.body)?;
                return Ok(record.key);
            }

            let record = LoginKeyRecord {
                key: generate_secret(),
            };
            if store
                .put(LOGIN_KEY_ID, None, encode(&record)?)
                .await?
                .is_some()
            {
                tracing::info!("Generated new login key");
                return Ok(record.key);
            }
            tracing::debug!(attempt, "Login key creation lost a race, re-reading");
        }

        Err(DbError::RetriesExhausted {
            key: LOGIN_KEY_ID.into(),
            attempts: MAX_WRITE_ATTEMPTS,
        })
    }
}

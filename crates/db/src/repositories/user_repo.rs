//! Repository for user documents.

use quire_core::roles::Role;

use crate::document::{decode, encode};
use crate::error::DbError;
use crate::models::system::{FirstUserMarker, FIRST_USER_ID};
use crate::models::user::{user_key, User, UserRecord};
use crate::store::{DocumentStore, Index, HIGH_SENTINEL, MAX_WRITE_ATTEMPTS};

/// Provides login bookkeeping and role management for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(
        store: &dyn DocumentStore,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        let key = user_key(email);
        let Some(doc) = store.get(&key).await? else {
            return Ok(None);
        };
        let record: UserRecord = decode(&key, doc.body)?;
        Ok(Some(User::from_record(key, record)))
    }

    /// Record a successful login, creating the user on first sight.
    ///
    /// Existing users are returned unchanged. A new user becomes `Admin` if
    /// their login is the one that creates the first-user marker, otherwise
    /// `Pending`. Once this call has won the marker it keeps the grant across
    /// retries, even if a concurrent request for the same email created the
    /// user document first.
    pub async fn record_login(store: &dyn DocumentStore, email: &str) -> Result<User, DbError> {
        let key = user_key(email);
        let mut granted_admin = false;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if let Some(doc) = store.get(&key).await? {
                let record: UserRecord = decode(&key, doc.body)?;
                if !granted_admin || record.role == Role::Admin {
                    return Ok(User::from_record(key, record));
                }

                let promoted = UserRecord {
                    role: Role::Admin,
                    ..record
                };
                if store
                    .put(&key, Some(doc.revision.as_str()), encode(&promoted)?)
                    .await?
                    .is_some()
                {
                    tracing::info!(user_id = %key, "Applied first-user admin grant");
                    return Ok(User::from_record(key, promoted));
                }
                tracing::debug!(user_id = %key, attempt, "Admin grant lost a race, retrying");
                continue;
            }

            if !granted_admin {
                let marker = FirstUserMarker {
                    email: email.to_lowercase(),
                };
                granted_admin = store
                    .put(FIRST_USER_ID, None, encode(&marker)?)
                    .await?
                    .is_some();
            }

            let record = UserRecord {
                email: email.to_lowercase(),
                role: if granted_admin { Role::Admin } else { Role::Pending },
            };
            if store.put(&key, None, encode(&record)?).await?.is_some() {
                tracing::info!(user_id = %key, role = %record.role, "Created user on first login");
                return Ok(User::from_record(key, record));
            }
            tracing::debug!(user_id = %key, attempt, "User creation lost a race, retrying");
        }

        Err(DbError::RetriesExhausted {
            key,
            attempts: MAX_WRITE_ATTEMPTS,
        })
    }

    /// Set the role of an existing user.
    ///
    /// Returns [`DbError::UnknownUser`] if nobody with `email` has logged in.
    pub async fn change_role(
        store: &dyn DocumentStore,
        email: &str,
        role: Role,
    ) -> Result<User, DbError> {
        let key = user_key(email);

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let Some(doc) = store.get(&key).await? else {
                return Err(DbError::UnknownUser(email.to_string()));
            };
            let mut record: UserRecord = decode(&key, doc.body)?;
            let previous = record.role;
            record.role = role;

            if store
                .put(&key, Some(doc.revision.as_str()), encode(&record)?)
                .await?
                .is_some()
            {
                tracing::info!(user_id = %key, from = %previous, to = %role, "Changed user role");
                return Ok(User::from_record(key, record));
            }
            tracing::debug!(user_id = %key, attempt, "Role change lost a race, retrying");
        }

        Err(DbError::RetriesExhausted {
            key,
            attempts: MAX_WRITE_ATTEMPTS,
        })
    }

    /// List all users ordered by email.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<User>, DbError> {
        store
            .range(Index::UsersByEmail, "", HIGH_SENTINEL)
            .await?
            .into_iter()
            .map(|row| {
                let role: Role = serde_json::from_value(row.value)?;
                Ok(User {
                    id: row.id,
                    email: row.key,
                    role,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()
    }
}

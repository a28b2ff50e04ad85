use crate::document::DocKind;

/// Errors raised by the document store and the repositories on top of it.
///
/// A revision conflict on an article update is *not* an error; see
/// [`UpdateOutcome`](crate::models::article::UpdateOutcome).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The backing database failed or is unreachable.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document exists under the key but is tagged as a different kind.
    #[error("Document '{key}' is of type '{found}', expected '{expected}'")]
    TypeMismatch {
        key: String,
        expected: DocKind,
        found: String,
    },

    /// No user document exists for the given email.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// A compare-and-swap loop kept losing races and gave up.
    #[error("Gave up writing '{key}' after {attempts} conflicting attempts")]
    RetriesExhausted { key: String, attempts: u32 },
}

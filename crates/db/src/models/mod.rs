//! Document models.
//!
//! `*Record` types are the bodies persisted in the store (their id and
//! revision live beside them); the plain types add id and revision back for
//! callers.

pub mod article;
pub mod system;
pub mod user;

//! Quire domain logic.
//!
//! Pure building blocks shared by the storage and HTTP layers: article id
//! rules, role capabilities, session check values, and the markdown
//! renderer with its reference-link rewriter. This crate has no internal
//! dependencies.

pub mod article;
pub mod error;
pub mod markdown;
pub mod roles;
pub mod session;
pub mod types;

//! Repositories: the read/modify/write protocols built on [`DocumentStore`].
//!
//! Each repository is a zero-sized struct whose methods take the store as
//! their first argument. None of them hold locks; every write is a
//! compare-and-swap via [`DocumentStore::put`].
//!
//! [`DocumentStore`]: crate::store::DocumentStore
//! [`DocumentStore::put`]: crate::store::DocumentStore::put

pub mod article_repo;
pub mod login_key_repo;
pub mod user_repo;

pub use article_repo::{ArticleRepo, ArticleTitles};
pub use login_key_repo::LoginKeyRepo;
pub use user_repo::UserRepo;

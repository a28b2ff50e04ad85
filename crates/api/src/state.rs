use std::sync::Arc;

use quire_db::store::DocumentStore;

use crate::auth::identity::IdentityVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding articles, users and the login key.
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<ServerConfig>,
    /// Checks login assertions with the third-party identity provider.
    pub verifier: Arc<dyn IdentityVerifier>,
}

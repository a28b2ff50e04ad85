//! Route definitions for the session endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /_login    -> login
/// POST /_logout   -> logout
/// GET  /_session  -> current_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/_login", post(auth::login))
        .route("/_logout", post(auth::logout))
        .route("/_session", get(auth::current_session))
}

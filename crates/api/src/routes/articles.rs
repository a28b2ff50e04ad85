//! Route definitions for articles and their history.
//!
//! Reserved paths (`/_login`, `/_admin`, ...) are static routes and take
//! precedence over `/{id}`.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// ```text
/// GET  /_history/{body_id}  -> get_history_body  (read)
/// GET  /                    -> get_index
/// PUT  /                    -> put_index         (write)
/// GET  /{id}                -> get_article
/// PUT  /{id}                -> put_article       (write)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/_history/{body_id}", get(articles::get_history_body))
        .route("/", get(articles::get_index).put(articles::put_index))
        .route("/{id}", get(articles::get_article).put(articles::put_article))
}

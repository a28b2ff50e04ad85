use axum::routing::post;
use axum::Router;

use crate::handlers::markdown;
use crate::state::AppState;

/// `POST /_markdown -> preview`
pub fn router() -> Router<AppState> {
    Router::new().route("/_markdown", post(markdown::preview))
}

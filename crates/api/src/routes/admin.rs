//! Route definitions for the `/_admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET  /_admin       -> overview     (admin)
/// POST /_admin/role  -> change_role  (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/_admin", get(admin::overview))
        .route("/_admin/role", post(admin::change_role))
}

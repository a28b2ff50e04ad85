pub mod admin;
pub mod articles;
pub mod auth;
pub mod health;
pub mod markdown;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /_health                 GET   liveness and store reachability
/// /_login                  POST  verify assertion, set session cookie
/// /_logout                 POST  clear session cookie
/// /_session                GET   current session capabilities
/// /_markdown               POST  render markdown preview (text/html)
/// /_admin                  GET   list users and articles (admin)
/// /_admin/role             POST  change a user's role (admin)
/// /_history/{body_id}      GET   superseded article body (read)
/// /                        GET, PUT  the index article
/// /{id}                    GET, PUT  any other article
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(markdown::router())
        .merge(admin::router())
        .merge(articles::router())
}

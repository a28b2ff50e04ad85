//! Handlers for the `/_admin` resource.

use axum::extract::State;
use axum::Json;
use quire_core::error::CoreError;
use quire_core::roles::Role;
use quire_db::models::article::ArticleSummary;
use quire_db::models::user::{user_key, User};
use quire_db::repositories::{ArticleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the admin page lists.
#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub users: Vec<User>,
    pub articles: Vec<ArticleSummary>,
}

/// Request body for `POST /_admin/role`.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub email: String,
    pub role: String,
}

/// GET /_admin -- all users and articles.
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AdminOverview>>> {
    let store = state.store.as_ref();
    let users = UserRepo::list(store).await?;
    let articles = ArticleRepo::list(store).await?;

    Ok(Json(DataResponse {
        data: AdminOverview { users, articles },
    }))
}

/// POST /_admin/role -- change another user's role.
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ChangeRoleRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    let role: Role = input.role.parse()?;

    let is_self = admin
        .email
        .as_deref()
        .is_some_and(|own| user_key(own) == user_key(input.email.trim()));
    if is_self {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot change your own role.".into(),
        )));
    }

    let user = UserRepo::change_role(state.store.as_ref(), input.email.trim(), role).await?;
    Ok(Json(DataResponse { data: user }))
}

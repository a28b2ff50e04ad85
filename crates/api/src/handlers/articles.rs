//! Handlers for articles (`/`, `/{id}`) and their history (`/_history/{id}`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quire_core::article::{article_id_from_path, is_valid_article_id, validate_article_id};
use quire_core::error::CoreError;
use quire_core::markdown::render_markdown;
use quire_core::roles::Capabilities;
use quire_db::models::article::{Article, ArticleUpdate, UpdateOutcome};
use quire_db::repositories::{ArticleRepo, ArticleTitles};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure, RequireRead, RequireWrite};
use crate::middleware::session::Session;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /{id}`.
#[derive(Debug, Deserialize)]
pub struct SaveArticleRequest {
    /// Revision the edit was based on; empty when creating the article.
    #[serde(default)]
    pub rev: String,
    pub title: String,
    pub markdown: String,
    #[serde(default)]
    pub is_public: bool,
}

/// An article as shown to a reader.
#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub article: Article,
    /// The article markdown rendered to HTML with `ref:` links resolved.
    pub html: String,
    pub capabilities: Capabilities,
    /// Whether the page should offer the public/private toggle.
    pub show_visibility: bool,
}

/// A superseded article body.
#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub id: String,
    pub markdown: String,
    pub html: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET / -- the index article.
pub async fn get_index(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    show_article(&state, session, "").await
}

/// GET /{id}
///
/// Responds 404 (with the placeholder article in the body) when the article
/// has never been saved.
pub async fn get_article(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    show_article(&state, session, &id).await
}

/// PUT / -- save the index article.
pub async fn put_index(
    State(state): State<AppState>,
    RequireWrite(session): RequireWrite,
    Json(input): Json<SaveArticleRequest>,
) -> AppResult<Response> {
    save_article(&state, session, "", input).await
}

/// PUT /{id}
///
/// Responds 201 `{ok, rev}` on success and 409 `{conflict: true}` if the
/// article changed since `rev`.
pub async fn put_article(
    State(state): State<AppState>,
    RequireWrite(session): RequireWrite,
    Path(id): Path<String>,
    Json(input): Json<SaveArticleRequest>,
) -> AppResult<Response> {
    save_article(&state, session, &id, input).await
}

/// GET /_history/{body_id}
pub async fn get_history_body(
    State(state): State<AppState>,
    RequireRead(_session): RequireRead,
    Path(body_id): Path<String>,
) -> AppResult<Json<DataResponse<HistoryPage>>> {
    let body = ArticleRepo::load_history_body(state.store.as_ref(), &body_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "HistoryBody",
            id: body_id.clone(),
        })?;

    let html = render_markdown(&body.markdown, &ArticleTitles(state.store.as_ref())).await?;

    Ok(Json(DataResponse {
        data: HistoryPage {
            id: body.id,
            markdown: body.markdown,
            html,
        },
    }))
}

// ---------------------------------------------------------------------------
// Shared logic
// ---------------------------------------------------------------------------

async fn show_article(state: &AppState, session: Session, segment: &str) -> AppResult<Response> {
    let id = article_id_from_path(segment);
    if !is_valid_article_id(id) {
        return Err(not_found(id));
    }

    let article = ArticleRepo::load(state.store.as_ref(), id).await?;
    ensure(&session, article.is_public || session.capabilities.read, "read")?;

    let html = render_markdown(&article.markdown, &ArticleTitles(state.store.as_ref())).await?;
    let status = if article.exists() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    let show_visibility = session.is_logged_in() && !article.is_index();

    let page = ArticlePage {
        article,
        html,
        capabilities: session.capabilities,
        show_visibility,
    };
    Ok((status, Json(DataResponse { data: page })).into_response())
}

async fn save_article(
    state: &AppState,
    session: Session,
    segment: &str,
    input: SaveArticleRequest,
) -> AppResult<Response> {
    let id = article_id_from_path(segment);
    validate_article_id(id)?;

    let author = session
        .email
        .ok_or_else(|| AppError::InternalError("write session without an email".into()))?;

    let update = ArticleUpdate {
        id: id.to_string(),
        expected_revision: input.rev,
        title: input.title,
        author,
        markdown: input.markdown,
        requested_public: input.is_public,
    };

    let response = match ArticleRepo::update(state.store.as_ref(), &update).await? {
        UpdateOutcome::Updated { revision } => (
            StatusCode::CREATED,
            Json(json!({ "ok": true, "rev": revision })),
        ),
        UpdateOutcome::Conflict => (StatusCode::CONFLICT, Json(json!({ "conflict": true }))),
    };
    Ok(response.into_response())
}

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Article",
        id: id.to_string(),
    })
}

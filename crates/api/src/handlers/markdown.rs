//! Handler for the markdown preview endpoint.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use quire_core::markdown::render_markdown;
use quire_db::repositories::ArticleTitles;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /_markdown -- render the raw request body as HTML.
pub async fn preview(State(state): State<AppState>, body: String) -> AppResult<impl IntoResponse> {
    let html = render_markdown(&body, &ArticleTitles(state.store.as_ref())).await?;
    Ok(([(CONTENT_TYPE, "text/html; charset=utf-8")], html))
}

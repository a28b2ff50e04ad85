//! Handlers for login, logout and the current session.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::error::CoreError;
use quire_core::roles::Capabilities;
use quire_core::session::check_value;
use quire_db::repositories::{LoginKeyRepo, UserRepo};
use serde::Deserialize;

use crate::auth::cookie::{clear_session_cookie, encode_session, is_cookie_safe, session_cookie};
use crate::auth::identity::IdentityError;
use crate::error::{AppError, AppResult};
use crate::middleware::session::Session;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /_login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Assertion issued by the identity provider.
    pub assertion: String,
}

/// POST /_login
///
/// Verifies the assertion, records the login (creating the user on first
/// sight) and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if input.assertion.trim().is_empty() {
        return Err(AppError::BadRequest("assertion must not be empty".into()));
    }

    let email = state
        .verifier
        .verify(&input.assertion)
        .await
        .map_err(|err| match err {
            IdentityError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Login assertion rejected");
                AppError::Core(CoreError::Unauthorized("Login was not accepted".into()))
            }
            other => AppError::InternalError(other.to_string()),
        })?;

    if !is_cookie_safe(&email) {
        tracing::warn!(email = %email.escape_debug(), "Verified email cannot be held in a cookie");
        return Err(AppError::BadRequest(
            "This email address cannot be used to sign in".into(),
        ));
    }

    let store = state.store.as_ref();
    let user = UserRepo::record_login(store, &email).await?;
    let secret = LoginKeyRepo::load_or_create(store).await?;
    let value = encode_session(&email, &check_value(&secret, &email))
        .ok_or_else(|| AppError::InternalError("session cookie encoding failed".into()))?;
    let cookie = session_cookie(&value, state.config.cookie_secure);

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    let session = Session {
        email: Some(email),
        role: Some(user.role),
        capabilities: Capabilities::for_role(Some(user.role)),
    };
    Ok(([(SET_COOKIE, cookie)], Json(DataResponse { data: session })))
}

/// POST /_logout -- clears the session cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}

/// GET /_session -- who the caller is and what they may do.
pub async fn current_session(session: Session) -> Json<DataResponse<Session>> {
    Json(DataResponse { data: session })
}

//! Cookie-based session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quire_core::roles::{Capabilities, Role};
use quire_core::session::verify_check_value;
use quire_db::repositories::{LoginKeyRepo, UserRepo};
use serde::Serialize;

use crate::auth::cookie::{decode_session, read_cookie, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The caller's session, resolved from the `auth` cookie.
///
/// A missing or malformed cookie, or one whose check value does not match,
/// yields an anonymous session rather than an error. A verified email that
/// has no user document gets no capabilities.
///
/// ```ignore
/// async fn my_handler(session: Session) -> AppResult<Json<()>> {
///     tracing::info!(email = ?session.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(flatten)]
    pub capabilities: Capabilities,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.email.is_some()
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some((email, check)) =
            read_cookie(&parts.headers, SESSION_COOKIE).and_then(decode_session)
        else {
            return Ok(Session::anonymous());
        };

        let secret = LoginKeyRepo::load_or_create(state.store.as_ref()).await?;
        if !verify_check_value(&secret, email, check) {
            tracing::warn!(email = %email, "Session cookie failed its check");
            return Ok(Session::anonymous());
        }

        let role = UserRepo::find_by_email(state.store.as_ref(), email)
            .await?
            .map(|user| user.role);

        Ok(Session {
            email: Some(email.to_string()),
            role,
            capabilities: Capabilities::for_role(role),
        })
    }
}

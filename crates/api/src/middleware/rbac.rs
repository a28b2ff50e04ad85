//! Capability-based access control extractors.
//!
//! Each extractor wraps [`Session`] and rejects requests that lack the
//! capability: anonymous callers get 401, logged-in callers 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quire_core::error::CoreError;

use super::session::Session;
use crate::error::AppError;
use crate::state::AppState;

/// Reject `session` unless `allowed`.
pub fn ensure(session: &Session, allowed: bool, capability: &str) -> Result<(), AppError> {
    if allowed {
        return Ok(());
    }
    let err = if session.is_logged_in() {
        CoreError::Forbidden(format!("The {capability} permission is required"))
    } else {
        CoreError::Unauthorized("Login required".into())
    };
    Err(AppError::Core(err))
}

/// Requires the read capability.
pub struct RequireRead(pub Session);

impl FromRequestParts<AppState> for RequireRead {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        ensure(&session, session.capabilities.read, "read")?;
        Ok(RequireRead(session))
    }
}

/// Requires the write capability.
///
/// ```ignore
/// async fn save(RequireWrite(session): RequireWrite) -> AppResult<Json<()>> {
///     // session.email is guaranteed to be set here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireWrite(pub Session);

impl FromRequestParts<AppState> for RequireWrite {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        ensure(&session, session.capabilities.write, "write")?;
        Ok(RequireWrite(session))
    }
}

/// Requires the admin capability.
pub struct RequireAdmin(pub Session);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        ensure(&session, session.capabilities.admin, "admin")?;
        Ok(RequireAdmin(session))
    }
}

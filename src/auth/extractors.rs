use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::dto::PublicUser;
use crate::auth::repo;
use crate::error::Error;
use crate::state::AppState;

/// Extracts the bearer token and checks it against the persisted session,
/// yielding the session's user projection.
pub struct CurrentUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| Error::Unauthorized("missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| Error::Unauthorized("invalid auth scheme".into()))?;

        let session = repo::load_session(state.store.as_ref())
            .await?
            .filter(|s| s.token == token)
            .ok_or_else(|| Error::Unauthorized("invalid or expired token".into()))?;

        Ok(CurrentUser(session.user))
    }
}

//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{AppError, AuthenticatedUser};

use crate::error::ApiError;
use crate::state::ApiState;

/// The authenticated principal, unpacked from the `Authorization: Bearer`
/// session token. Every board route requires it; absence or an invalid
/// token rejects the request with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct Viewer(pub AuthenticatedUser);

impl FromRequestParts<ApiState> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".into()))?;
        let user = state.sessions.verify(token)?;
        Ok(Viewer(user))
    }
}

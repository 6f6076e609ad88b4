//! Authentication middleware for bearer token validation

use axum::{
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller, attached to the request for its lifetime only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Authentication middleware
///
/// Every failure, whatever its cause, becomes the same 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let user_id = state.jwt_service.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser { id: user_id });

    Ok(next.run(req).await)
}

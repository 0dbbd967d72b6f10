use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;

/// Identity of the caller, bound by [`require_auth`] for downstream handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

/// Extract and validate the bearer token from the Authorization header.
///
/// A missing header, a non-Bearer scheme and a token that fails
/// verification produce the same response.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        debug!("rejected request without bearer token");
        return Err(ApiError::Unauthenticated);
    };

    let user_id = state.tokens.verify(token).map_err(|_| {
        debug!("rejected request with invalid token");
        ApiError::Unauthenticated
    })?;

    req.extensions_mut().insert(AuthUser { id: user_id });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

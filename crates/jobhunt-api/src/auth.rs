use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info, warn};

use jobhunt_db::Database;
use jobhunt_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::password;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenService) -> AppState {
        Arc::new(Self { db, tokens })
    }
}

/// Run storage work (and password hashing) off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&AppStateInner) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("blocking task failed".into())
        })?
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = req.normalized_email();
    let password = req.password;

    let user = blocking(&state, move |s| {
        let hash = password::hash_password(&password)
            .map_err(|e| ApiError::Internal(format!("password hash: {e}")))?;
        Ok(s.db.create_user(&email, &hash)?)
    })
    .await?;

    info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

/// Unknown email and wrong password produce the same response, after the
/// same amount of hashing work.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = req.normalized_email();
    let password = req.password;

    let user_id = blocking(&state, move |s| {
        let Some(user) = s.db.get_user_by_email(&email)? else {
            password::verify_dummy(&password);
            return Err(ApiError::InvalidCredentials);
        };

        let matches = password::verify_password(&password, &user.password)
            .map_err(|e| ApiError::Internal(format!("stored hash for user {}: {e}", user.id)))?;
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(user.id)
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::InvalidCredentials) {
            warn!("failed login attempt");
        }
    })?;

    let token = state.tokens.issue(user_id)?;
    info!(user_id, "user logged in");

    Ok(Json(LoginResponse { token, user_id }))
}

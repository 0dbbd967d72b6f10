use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use jobhunt_db::StoreError;
use jobhunt_types::validate::{self, FieldError, ValidationErrors};

use crate::token::TokenError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors as the caller sees them.
///
/// `NotFound` deliberately covers both "no such row" and "not yours", and
/// `Unauthenticated` covers every way a bearer token can be wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(errors) => ErrorBody {
                error: "validation failed",
                fields: Some(validate::field_errors(errors)),
            },
            ApiError::Internal(detail) => {
                // Detail stays in the server log.
                error!("internal error: {}", detail);
                ErrorBody {
                    error: "internal server error",
                    fields: None,
                }
            }
            ApiError::DuplicateEmail => ErrorBody {
                error: "email already registered",
                fields: None,
            },
            ApiError::InvalidCredentials => ErrorBody {
                error: "invalid credentials",
                fields: None,
            },
            ApiError::Unauthenticated => ErrorBody {
                error: "authentication required",
                fields: None,
            },
            ApiError::NotFound => ErrorBody {
                error: "not found",
                fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ApiError::Unauthenticated,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

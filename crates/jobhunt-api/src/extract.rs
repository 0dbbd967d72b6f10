//! Extractors that report bad input as [`ApiError::Validation`] instead of
//! axum's plain-text rejections.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use jobhunt_types::validate::{self, Validate};

use crate::error::ApiError;

/// JSON body that has been deserialized and passed [`Validate`].
///
/// Malformed JSON, missing fields and failed field checks are all reported
/// as [`ApiError::Validation`].
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| validate::single("body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters. Every route takes a single numeric `{id}`, so a bad
/// segment is reported against `id`.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validate::single("id", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string, deserialized and passed [`Validate`].
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validate::single("query", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

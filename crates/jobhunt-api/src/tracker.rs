//! Handlers for the per-user tracker records (company lists, internships).
//!
//! One set of generic handlers serves every [`OwnedRecord`]; the router
//! instantiates them per table.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use jobhunt_db::OwnedRecord;
use jobhunt_types::validate::Validate;

use crate::auth::{AppState, blocking};
use crate::error::ApiResult;
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::AuthUser;

pub async fn create<T>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(fields): ValidJson<T::Fields>,
) -> ApiResult<(StatusCode, Json<T>)>
where
    T: OwnedRecord + Serialize,
    T::Fields: DeserializeOwned + Validate,
{
    let record = blocking(&state, move |s| Ok(s.db.create_owned::<T>(user.id, &fields)?)).await?;
    debug!(table = T::TABLE, user_id = user.id, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list<T>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<T>>>
where
    T: OwnedRecord + Serialize,
{
    let records = blocking(&state, move |s| Ok(s.db.list_owned::<T>(user.id)?)).await?;
    Ok(Json(records))
}

pub async fn update<T>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(fields): ValidJson<T::Fields>,
) -> ApiResult<StatusCode>
where
    T: OwnedRecord,
    T::Fields: DeserializeOwned + Validate,
{
    blocking(&state, move |s| Ok(s.db.update_owned::<T>(id, user.id, &fields)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<T>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<StatusCode>
where
    T: OwnedRecord,
{
    blocking(&state, move |s| Ok(s.db.delete_owned::<T>(id, user.id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

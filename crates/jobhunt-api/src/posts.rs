use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use tracing::{debug, info};

use jobhunt_types::api::{DEFAULT_PAGE_LIMIT, LikeResponse, NewComment, NewPost, PageQuery};
use jobhunt_types::models::{Comment, Post, PostDetail, PostView};

use crate::auth::{AppState, blocking};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::AuthUser;

/// Upper bound on `limit` for the board listing.
pub const MAX_PAGE_LIMIT: u32 = 100;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(new): ValidJson<NewPost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = blocking(&state, move |s| Ok(s.db.create_post(user.id, &new)?)).await?;
    info!(post_id = post.id, user_id = user.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> ApiResult<Json<Vec<PostView>>> {
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
    let offset = page.offset.unwrap_or(0);

    let posts = blocking(&state, move |s| Ok(s.db.list_posts(user.id, limit, offset)?)).await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<Json<PostDetail>> {
    let detail = blocking(&state, move |s| {
        s.db.get_post_detail(user.id, id)?.ok_or(ApiError::NotFound)
    })
    .await?;
    Ok(Json(detail))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |s| Ok(s.db.delete_post(id, user.id)?)).await?;
    info!(post_id = id, user_id = user.id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Liking twice is not an error; the second call changes nothing.
pub async fn like_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<(StatusCode, Json<LikeResponse>)> {
    let added = blocking(&state, move |s| Ok(s.db.like_post(id, user.id)?)).await?;
    if !added {
        debug!(post_id = id, user_id = user.id, "already liked");
    }
    Ok((
        StatusCode::CREATED,
        Json(LikeResponse {
            post_id: id,
            liked: true,
        }),
    ))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<StatusCode> {
    let removed = blocking(&state, move |s| Ok(s.db.unlike_post(id, user.id)?)).await?;
    if !removed {
        debug!(post_id = id, user_id = user.id, "nothing to unlike");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidPath(post_id): ValidPath<i64>,
    ValidJson(new): ValidJson<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = blocking(&state, move |s| Ok(s.db.create_comment(post_id, user.id, &new)?)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

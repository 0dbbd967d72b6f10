use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use jobhunt_types::models::{CompanyList, Internship};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{posts, tracker};

/// All routes. `/register` and `/login` are public; everything else sits
/// behind [`require_auth`].
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/company_lists",
            post(tracker::create::<CompanyList>).get(tracker::list::<CompanyList>),
        )
        .route(
            "/company_lists/{id}",
            put(tracker::update::<CompanyList>).delete(tracker::delete::<CompanyList>),
        )
        .route(
            "/internships",
            post(tracker::create::<Internship>).get(tracker::list::<Internship>),
        )
        .route(
            "/internships/{id}",
            put(tracker::update::<Internship>).delete(tracker::delete::<Internship>),
        )
        .route("/posts", post(posts::create_post).get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post).delete(posts::delete_post))
        .route("/posts/{id}/like", post(posts::like_post).delete(posts::unlike_post))
        .route("/posts/{id}/comments", post(posts::create_comment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

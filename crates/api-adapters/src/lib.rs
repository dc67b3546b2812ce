//! The web routing and orchestration layer for Top 5 Lister.
//!
//! All `/top5list*`, `/communitylist*`, and `/loggedIn` routes sit behind
//! the session-cookie middleware; `/login`, `/register`, and `/logout` are
//! open.

pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domains::{AuthProvider, UserRepo};
use services::{CommunityService, ListService, UserService};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub user_repo: Arc<dyn UserRepo>,
    pub auth: Arc<dyn AuthProvider>,
    pub lists: Arc<ListService>,
    pub community: Arc<CommunityService>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/top5list", post(handlers::lists::create))
        .route(
            "/top5list/{id}",
            get(handlers::lists::get_one)
                .put(handlers::lists::update)
                .delete(handlers::lists::remove),
        )
        .route("/top5lists", get(handlers::lists::get_all))
        .route("/top5list/{id}/rating", put(handlers::lists::rate))
        .route("/top5list/{id}/views", post(handlers::lists::view))
        .route("/top5list/{id}/comments", post(handlers::lists::comment))
        .route("/communitylist", post(handlers::community::create))
        .route(
            "/communitylist/{id}",
            get(handlers::community::get_one)
                .put(handlers::community::update)
                .delete(handlers::community::remove),
        )
        .route("/communitylists", get(handlers::community::get_all))
        .route("/communitylist/{id}/rating", put(handlers::community::rate))
        .route("/communitylist/{id}/views", post(handlers::community::view))
        .route("/communitylist/{id}/comments", post(handlers::community::comment))
        .route("/loggedIn", get(handlers::auth::logged_in))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    let open = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/logout", get(handlers::auth::logout));

    Router::new()
        .merge(protected)
        .merge(open)
        .layer(TraceLayer::new_for_http())
        .layer(cors_policy())
        .with_state(state)
}

// Permissive CORS so the SPA can live on another origin during development.
fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
}

//! Route definitions for the SiteCrew HTTP API.
//!
//! Entity routes are mounted under `/api`. Session resolution and the CSRF
//! check wrap the whole tree so they see full request paths.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the session/CSRF middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(worker_routes())
        .merge(object_routes())
        .merge(schedule_routes())
        .merge(security_routes())
        .route("/dashboard", get(handlers::dashboard::dashboard));

    // Layers run bottom-up: session resolution before the CSRF check.
    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::csrf::csrf_protect,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::resolve_session,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Auth endpoints: login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me).put(handlers::auth::update_me))
}

/// User administration (admin only)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
}

/// Worker profiles
fn worker_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workers",
            get(handlers::workers::list_workers).post(handlers::workers::create_worker),
        )
        .route(
            "/workers/{id}",
            get(handlers::workers::get_worker)
                .put(handlers::workers::update_worker)
                .delete(handlers::workers::delete_worker),
        )
        .route("/workers/positions", get(handlers::workers::list_positions))
        .route("/workers/{id}/user", put(handlers::workers::link_user))
}

/// Job objects
fn object_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/objects",
            get(handlers::objects::list_objects).post(handlers::objects::create_object),
        )
        .route(
            "/objects/{id}",
            get(handlers::objects::get_object)
                .put(handlers::objects::update_object)
                .delete(handlers::objects::delete_object),
        )
}

/// Schedule entries
fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/schedule",
            get(handlers::schedule::list_entries).post(handlers::schedule::create_entry),
        )
        .route(
            "/schedule/{id}",
            get(handlers::schedule::get_entry)
                .put(handlers::schedule::update_entry)
                .delete(handlers::schedule::delete_entry),
        )
}

/// Security observability (admin only)
fn security_routes() -> Router<AppState> {
    Router::new()
        .route("/security/stats", get(handlers::security::stats))
        .route("/security/events", get(handlers::security::events))
}

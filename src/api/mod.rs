//! HTTP API handlers, organized by functional domain.
//!
//! - `auth`: throttled login, logout
//! - `traffic`: visit recording and windowed dashboard reports
//! - `projects`: portfolio CRUD, paging, image upload
//! - `contact`: public contact-form mail relay
//! - `state`: shared `AppState` definition

pub(crate) mod auth;
pub(crate) mod contact;
pub(crate) mod projects;
mod state;
pub(crate) mod traffic;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

pub use state::AppState;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/traffic/visit", post(traffic::record_visit))
        .route("/api/traffic", get(traffic::report))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/:id",
            put(projects::update).delete(projects::remove),
        )
        .route("/api/projects/image", post(projects::upload_image))
        .route("/api/contact", post(contact::submit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pull the bearer token out of the `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))
}

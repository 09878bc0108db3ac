//! Login and logout handlers with attempt throttling.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::config;
use crate::core::Gate;
use crate::error::AppError;

use super::{bearer_token, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    attempt_login(&state, &addr.ip().to_string(), &req).map(Json)
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state.sessions.revoke(token);
    Ok(StatusCode::NO_CONTENT)
}

/// The whole login flow for one client key, extracted from the handler so it
/// can be exercised without a socket.
///
/// Gate first, credentials second: while a lockout is active the provider is
/// never contacted. A failure past the attempt threshold starts the
/// countdown timer for the key; a success clears both throttle state and any
/// running countdown before the role check.
pub(crate) fn attempt_login(
    state: &Arc<AppState>,
    key: &str,
    req: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    if let Gate::Denied { seconds_remaining } = state.throttle.check_gate(key) {
        return Err(AppError::Throttled { seconds_remaining });
    }

    let session = match state.auth.authenticate(&req.email, &req.password) {
        Ok(session) => session,
        Err(err) => {
            let outcome = state.throttle.record_failure(key);
            return Err(match outcome.locked_for_secs {
                Some(seconds_remaining) => {
                    state
                        .countdowns
                        .start(Arc::clone(&state.throttle), key.to_string());
                    tracing::info!(
                        %key,
                        attempts = outcome.attempt_count,
                        "Login locked out for {seconds_remaining}s"
                    );
                    AppError::Throttled { seconds_remaining }
                }
                None => {
                    tracing::info!(%key, attempt = outcome.attempt_count, "Failed login attempt");
                    AppError::Auth(format!(
                        "{err} ({}/{})",
                        outcome.attempt_count,
                        config::MAX_LOGIN_ATTEMPTS
                    ))
                }
            });
        }
    };

    state.throttle.record_success(key);
    state.countdowns.cancel(key);

    if session.role != Role::Admin {
        return Err(AppError::Unauthorized(
            "You do not have permission to access the admin panel".into(),
        ));
    }

    let email = session.email.clone();
    let token = state.sessions.issue(session);
    tracing::info!(%email, "Admin signed in");
    Ok(LoginResponse { token, email })
}

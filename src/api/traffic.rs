//! Visit recording and windowed dashboard report handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::analytics::{self, TrafficReport, TrafficWindow};
use crate::error::AppError;

use super::{bearer_token, AppState};

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    /// False when the store was unreachable; the dashboard proceeds anyway.
    pub recorded: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    #[serde(default = "default_window")]
    pub range: TrafficWindow,
}

fn default_window() -> TrafficWindow {
    TrafficWindow::SevenDays
}

/// `POST /api/traffic/visit` — count one dashboard load for today.
///
/// A store failure is reported in the body, not as an error: the dashboard
/// still renders with whatever the report endpoint can produce.
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<VisitResponse>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;

    let today = Utc::now().date_naive();
    let recorded = match state.database.record_visit(today) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to record visit for {today}: {e}");
            false
        }
    };
    Ok(Json(VisitResponse { recorded }))
}

/// `GET /api/traffic?range=7days|30days|all` — windowed dashboard report.
pub async fn report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ReportParams>,
) -> Result<Json<TrafficReport>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;

    let today = Utc::now().date_naive();
    Ok(Json(analytics::window_report(
        &state.database,
        params.range,
        today,
    )))
}

//! Portfolio project CRUD and image upload handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db::{ProjectDraft, ProjectPage};
use crate::error::AppError;

use super::{bearer_token, AppState};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    /// Base64-encoded file contents.
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

/// Reject drafts without a title; every other field may be blank.
pub(crate) fn validate_draft(draft: &ProjectDraft) -> Result<(), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".into()));
    }
    Ok(())
}

/// `GET /api/projects?page=N` — one page, newest first, plus total count.
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ProjectPage>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;
    let page = state
        .database
        .list_projects(params.page, config::PROJECT_PAGE_SIZE)
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(page))
}

/// `POST /api/projects`
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<CreatedResponse>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;
    validate_draft(&draft)?;

    let id = state
        .database
        .insert_project(&draft)
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!(id, title = %draft.title, "Project created");
    Ok(Json(CreatedResponse { id }))
}

/// `PUT /api/projects/:id`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;
    validate_draft(&draft)?;

    let updated = state
        .database
        .update_project(id, &draft)
        .map_err(|e| AppError::Database(e.to_string()))?;
    if updated == 0 {
        return Err(AppError::NotFound(format!("No project with id {id}")));
    }
    tracing::info!(id, "Project updated");
    Ok(Json(serde_json::json!({ "updated": true })))
}

/// `DELETE /api/projects/:id`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;

    let deleted = state
        .database
        .delete_project(id)
        .map_err(|e| AppError::Database(e.to_string()))?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("No project with id {id}")));
    }
    tracing::info!(id, "Project deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// `POST /api/projects/image` — store a base64 payload, return its public URL.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(upload): Json<ImageUpload>,
) -> Result<Json<ImageUploadResponse>, AppError> {
    state.sessions.require_admin(bearer_token(&headers)?)?;

    let bytes = BASE64
        .decode(upload.data.as_bytes())
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 image data: {e}")))?;
    let url = state.blob_store.store(&upload.file_name, &bytes)?;
    tracing::info!(file = %upload.file_name, %url, "Image uploaded");
    Ok(Json(ImageUploadResponse { url }))
}

#[cfg(test)]
mod tests {
    use axum::http::header::AUTHORIZATION;

    use super::super::tests::{admin_token, test_state};
    use super::*;

    fn auth_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        headers
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: "a project".into(),
            devstack: "Rust".into(),
            link: String::new(),
            git: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_validate_draft_requires_title() {
        assert!(validate_draft(&draft("ok")).is_ok());
        assert_eq!(
            validate_draft(&draft("  ")).unwrap_err().kind(),
            "InvalidInput"
        );
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let state = test_state();
        let token = admin_token(&state);

        let created = create(
            State(Arc::clone(&state)),
            auth_headers(&token),
            Json(draft("alpha")),
        )
        .await
        .unwrap();

        let page = list(
            State(Arc::clone(&state)),
            auth_headers(&token),
            Query(ListParams { page: 1 }),
        )
        .await
        .unwrap();
        assert_eq!(page.0.total, 1);
        assert_eq!(page.0.projects[0].title, "alpha");

        update(
            State(Arc::clone(&state)),
            Path(created.0.id),
            auth_headers(&token),
            Json(draft("beta")),
        )
        .await
        .unwrap();

        remove(
            State(Arc::clone(&state)),
            Path(created.0.id),
            auth_headers(&token),
        )
        .await
        .unwrap();
        assert_eq!(state.database.count_projects().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_project_is_not_found() {
        let state = test_state();
        let token = admin_token(&state);

        let err = update(
            State(Arc::clone(&state)),
            Path(999),
            auth_headers(&token),
            Json(draft("ghost")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }

    #[tokio::test]
    async fn test_endpoints_require_admin_session() {
        let state = test_state();
        let err = list(
            State(Arc::clone(&state)),
            HeaderMap::new(),
            Query(ListParams { page: 1 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_upload_image_decodes_and_stores() {
        let state = test_state();
        let token = admin_token(&state);

        let response = upload_image(
            State(Arc::clone(&state)),
            auth_headers(&token),
            Json(ImageUpload {
                file_name: "shot.png".into(),
                data: BASE64.encode(b"png-bytes"),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.url, "/media/shot.png");
    }

    #[tokio::test]
    async fn test_upload_image_rejects_bad_base64() {
        let state = test_state();
        let token = admin_token(&state);

        let err = upload_image(
            State(Arc::clone(&state)),
            auth_headers(&token),
            Json(ImageUpload {
                file_name: "shot.png".into(),
                data: "not base64!!!".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
    }
}

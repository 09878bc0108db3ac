//! Unified error type for all API handlers.
//!
//! `AppError` is the single error type returned by every HTTP handler. It
//! serializes as `{ "kind": "...", "message": "..." }` so the frontend can
//! programmatically distinguish error categories, and it maps each failure
//! domain to an HTTP status via `IntoResponse`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::ser::SerializeStruct;

/// Application-level error returned by all API handlers.
///
/// Each variant maps to a distinct failure domain. The frontend receives a
/// JSON object with `kind` (variant name) and `message` (human-readable
/// description).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Errors originating from SQLite / database operations.
    #[error("{0}")]
    Database(String),

    /// Invalid credentials on a login attempt.
    #[error("{0}")]
    Auth(String),

    /// The login gate is closed by an active lockout.
    #[error("Too many failed attempts. Try again in {seconds_remaining}s.")]
    Throttled { seconds_remaining: u64 },

    /// Session is missing, expired, or lacks the admin role.
    #[error("{0}")]
    Unauthorized(String),

    /// Errors from the image blob store.
    #[error("{0}")]
    Storage(String),

    /// Errors dispatching outgoing mail.
    #[error("{0}")]
    Mail(String),

    /// Invalid or missing user input.
    #[error("{0}")]
    InvalidInput(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Auth(_) => "Auth",
            AppError::Throttled { .. } => "Throttled",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Storage(_) => "Storage",
            AppError::Mail(_) => "Mail",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Custom Serialize: produces `{ "kind": "Variant", "message": "..." }` for the frontend.
impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_returns_correct_variant_name() {
        assert_eq!(AppError::Database("db fail".into()).kind(), "Database");
        assert_eq!(AppError::Auth("bad creds".into()).kind(), "Auth");
        assert_eq!(
            AppError::Throttled { seconds_remaining: 30 }.kind(),
            "Throttled"
        );
        assert_eq!(
            AppError::Unauthorized("not admin".into()).kind(),
            "Unauthorized"
        );
        assert_eq!(AppError::Storage("disk full".into()).kind(), "Storage");
        assert_eq!(AppError::Mail("relay down".into()).kind(), "Mail");
        assert_eq!(
            AppError::InvalidInput("bad input".into()).kind(),
            "InvalidInput"
        );
        assert_eq!(AppError::NotFound("no row".into()).kind(), "NotFound");
    }

    #[test]
    fn test_error_display_shows_message() {
        let err = AppError::Database("connection lost".into());
        assert_eq!(err.to_string(), "connection lost");
    }

    #[test]
    fn test_throttled_display_includes_seconds() {
        let err = AppError::Throttled { seconds_remaining: 12 };
        assert_eq!(
            err.to_string(),
            "Too many failed attempts. Try again in 12s."
        );
    }

    #[test]
    fn test_error_serializes_as_kind_and_message() {
        let err = AppError::Auth("invalid credentials".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "Auth");
        assert_eq!(json["message"], "invalid credentials");
    }

    #[test]
    fn test_from_anyhow_produces_database_variant() {
        let anyhow_err = anyhow::anyhow!("sqlite busy");
        let app_err: AppError = anyhow_err.into();
        assert_eq!(app_err.kind(), "Database");
        assert!(app_err.to_string().contains("sqlite busy"));
    }

    #[test]
    fn test_from_io_error_produces_storage_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), "Storage");
        assert!(app_err.to_string().contains("file missing"));
    }

    #[test]
    fn test_status_codes_per_domain() {
        assert_eq!(
            AppError::Auth("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Throttled { seconds_remaining: 1 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Database("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_all_variants_serialize_with_two_fields() {
        let variants: Vec<AppError> = vec![
            AppError::Database("a".into()),
            AppError::Auth("b".into()),
            AppError::Throttled { seconds_remaining: 5 },
            AppError::Unauthorized("c".into()),
            AppError::Storage("d".into()),
            AppError::Mail("e".into()),
            AppError::InvalidInput("f".into()),
            AppError::NotFound("g".into()),
        ];
        for err in variants {
            let json = serde_json::to_value(&err).unwrap();
            let obj = json.as_object().unwrap();
            assert_eq!(obj.len(), 2, "Expected exactly 2 fields for {err:?}");
            assert!(obj.contains_key("kind"));
            assert!(obj.contains_key("message"));
        }
    }
}

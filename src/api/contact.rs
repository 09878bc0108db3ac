//! Public contact-form mail relay.
//!
//! The one endpoint the public site talks to directly. The wire contract is
//! fixed: `{"success": true}` on success, HTTP 500 with `{"error": "..."}`
//! on any failure.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::mailer::{auto_reply_email, notification_email, ContactMessage, Mailer, SiteIdentity};

use super::AppState;

/// `POST /api/contact`
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(msg): Json<ContactMessage>,
) -> Response {
    match relay(state.mailer.as_ref(), &state.site, &msg).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            tracing::error!("Error sending contact email: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Validate the submission, then dispatch the owner notification followed by
/// the auto-reply to the sender.
pub(crate) async fn relay(
    mailer: &dyn Mailer,
    site: &SiteIdentity,
    msg: &ContactMessage,
) -> Result<(), AppError> {
    msg.validate()?;
    mailer.send(&notification_email(msg, site)).await?;
    mailer.send(&auto_reply_email(msg, site)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::mailer::OutgoingEmail;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Mail("relay unreachable".into()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn site() -> SiteIdentity {
        SiteIdentity {
            owner: "Naufal".into(),
            inbox: "owner@example.com".into(),
        }
    }

    fn msg() -> ContactMessage {
        ContactMessage {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            message: "Hello!".into(),
        }
    }

    #[tokio::test]
    async fn test_relay_sends_notification_then_auto_reply() {
        let mailer = RecordingMailer::default();
        relay(&mailer, &site(), &msg()).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[1].to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_relay_rejects_incomplete_submission() {
        let mailer = RecordingMailer::default();
        let mut bad = msg();
        bad.email = String::new();

        let err = relay(&mailer, &site(), &bad).await.unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relay_surfaces_mailer_failure() {
        let mailer = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        let err = relay(&mailer, &site(), &msg()).await.unwrap_err();
        assert_eq!(err.kind(), "Mail");
    }
}

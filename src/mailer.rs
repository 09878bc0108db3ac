//! Outgoing mail seam and the contact-form message flow.
//!
//! A submitted contact form produces two messages: a notification to the
//! site owner's inbox and an auto-reply back to the sender. The [`Mailer`]
//! contract only fixes the structural fields of a message; the shipped
//! [`RelayMailer`] posts them as JSON to an HTTP mail-relay endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A contact-form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Reject submissions missing a required field.
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::InvalidInput(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// A fully addressed outgoing email.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Identity stamped onto outgoing mail.
#[derive(Debug, Clone)]
pub struct SiteIdentity {
    /// Display name of the site owner.
    pub owner: String,
    /// Mailbox that receives contact notifications.
    pub inbox: String,
}

/// Dispatch contract for a single structured message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

/// Notification to the site owner about a new contact message.
pub fn notification_email(msg: &ContactMessage, site: &SiteIdentity) -> OutgoingEmail {
    let phone = msg.phone.as_deref().unwrap_or("Not provided");
    OutgoingEmail {
        from_name: "Portfolio Contact".to_string(),
        to: site.inbox.clone(),
        subject: format!(
            "New contact message from {} {}",
            msg.first_name, msg.last_name
        ),
        html_body: format!(
            "<h1>New contact message</h1>\
             <p><strong>Name:</strong> {} {}</p>\
             <p><strong>Email:</strong> <a href=\"mailto:{}\">{}</a></p>\
             <p><strong>Phone:</strong> {}</p>\
             <h2>Message</h2><p>{}</p>",
            msg.first_name, msg.last_name, msg.email, msg.email, phone, msg.message
        ),
        text_body: format!(
            "NEW CONTACT MESSAGE\n\nName: {} {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n",
            msg.first_name, msg.last_name, msg.email, phone, msg.message
        ),
    }
}

/// Auto-reply confirming receipt to the person who wrote in.
pub fn auto_reply_email(msg: &ContactMessage, site: &SiteIdentity) -> OutgoingEmail {
    OutgoingEmail {
        from_name: site.owner.clone(),
        to: msg.email.clone(),
        subject: "Thank you for reaching out!".to_string(),
        html_body: format!(
            "<h1>Thank you!</h1>\
             <p>Hi <strong>{}</strong>,</p>\
             <p>Your message has been received. I'll get back to you as soon \
             as possible, typically within 24-48 hours.</p>\
             <p>Best regards,<br>{}</p>",
            msg.first_name, site.owner
        ),
        text_body: format!(
            "Hi {},\n\nYour message has been received. I'll get back to you as \
             soon as possible, typically within 24-48 hours.\n\nBest regards,\n{}\n",
            msg.first_name, site.owner
        ),
    }
}

/// Mailer posting JSON to an HTTP relay endpoint.
pub struct RelayMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RelayMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        if self.endpoint.is_empty() {
            return Err(AppError::Mail("Mail relay is not configured".into()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Mail(format!(
                "Mail relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

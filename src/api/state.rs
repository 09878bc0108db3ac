//! Shared application state behind the API handlers.

use std::sync::Arc;

use crate::auth::{AuthProvider, SessionManager};
use crate::core::LoginThrottle;
use crate::db::Database;
use crate::mailer::{Mailer, SiteIdentity};
use crate::services::LockoutCountdowns;
use crate::storage::BlobStore;

/// Shared application state handed to every handler.
pub struct AppState {
    pub database: Arc<Database>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: Arc<SessionManager>,
    pub throttle: Arc<LoginThrottle>,
    pub countdowns: Arc<LockoutCountdowns>,
    pub blob_store: Arc<dyn BlobStore>,
    pub mailer: Arc<dyn Mailer>,
    /// Identity stamped onto outgoing contact mail.
    pub site: SiteIdentity,
}

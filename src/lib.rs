//! folio-admin: self-hosted backend for a personal portfolio site.
//!
//! Serves the JSON API behind the public site and its admin dashboard:
//! throttled login, per-day visit analytics, project CRUD with image
//! upload, and the contact-form mail relay.

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod mailer;
pub mod services;
pub mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::{SessionManager, SingleAdmin};
use crate::core::{LoginThrottle, MemoryAttemptStore, SystemClock};
use crate::mailer::{RelayMailer, SiteIdentity};
use crate::services::LockoutCountdowns;
use crate::storage::LocalBlobStore;

/// Load settings, open the database, and serve the API until shutdown.
pub async fn run() -> anyhow::Result<()> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in folio-admin: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_admin=info,tower_http=info".into()),
        )
        .init();

    // A missing .env file is fine; real environment variables win either way.
    let _ = dotenvy::dotenv();
    let settings = config::Settings::from_env()?;

    if let Some(parent) = settings.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let database = Arc::new(db::Database::open(&settings.db_path)?);
    tracing::info!("Database opened at {}", settings.db_path.display());

    let state = Arc::new(AppState {
        database,
        auth: Arc::new(SingleAdmin::new(
            settings.admin_email.clone(),
            settings.admin_password.clone(),
        )),
        sessions: Arc::new(SessionManager::new()),
        throttle: Arc::new(LoginThrottle::new(
            Arc::new(MemoryAttemptStore::default()),
            Arc::new(SystemClock),
        )),
        countdowns: Arc::new(LockoutCountdowns::new()),
        blob_store: Arc::new(LocalBlobStore::new(
            settings.media_dir.clone(),
            settings.media_base_url.clone(),
        )),
        mailer: Arc::new(RelayMailer::new(
            settings.mail_relay_url.clone(),
            settings.mail_relay_key.clone(),
        )),
        site: SiteIdentity {
            owner: settings.site_owner.clone(),
            inbox: settings.contact_inbox.clone(),
        },
    });

    let app = api::router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("folio-admin listening on http://{}", settings.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    state.countdowns.shutdown();
    Ok(())
}

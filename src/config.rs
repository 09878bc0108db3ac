//! Centralized runtime constants and environment-backed settings.
//!
//! All tunable thresholds and intervals are collected here so they can be
//! found and adjusted in a single place rather than scattered across modules.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Failed login attempts allowed before a temporary lockout is imposed.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Duration of the login lockout once the attempt threshold is reached (seconds).
pub const LOCKOUT_DURATION_SECS: i64 = 30;

/// Cadence of the lockout countdown tick while a lockout is active (seconds).
pub const COUNTDOWN_TICK_SECS: u64 = 1;

/// Number of project rows returned per page of the admin project list.
pub const PROJECT_PAGE_SIZE: u32 = 5;

/// Runtime settings resolved from the environment at startup.
///
/// A `.env` file is honored when present (via `dotenvy`); real environment
/// variables take precedence. Only the admin credentials are mandatory.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Directory uploaded project images are written to.
    pub media_dir: PathBuf,
    /// Public URL prefix under which `media_dir` is served.
    pub media_base_url: String,
    /// Email address of the sole admin account.
    pub admin_email: String,
    /// Password of the sole admin account.
    pub admin_password: String,
    /// HTTP endpoint of the outbound mail relay.
    pub mail_relay_url: String,
    /// API key sent to the mail relay.
    pub mail_relay_key: String,
    /// Display name used as the sender of outgoing mail.
    pub site_owner: String,
    /// Mailbox that receives contact-form notifications.
    pub contact_inbox: String,
}

impl Settings {
    /// Resolve settings from the process environment.
    ///
    /// Fails when the admin credentials are missing; everything else falls
    /// back to a development-friendly default.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_or("FOLIO_BIND_ADDR", "127.0.0.1:8080").parse()?;
        let admin_email = env::var("FOLIO_ADMIN_EMAIL")
            .map_err(|_| anyhow::anyhow!("FOLIO_ADMIN_EMAIL is not set"))?;
        let admin_password = env::var("FOLIO_ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("FOLIO_ADMIN_PASSWORD is not set"))?;

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(env_or("FOLIO_DB_PATH", "folio.db")),
            media_dir: PathBuf::from(env_or("FOLIO_MEDIA_DIR", "media")),
            media_base_url: env_or("FOLIO_MEDIA_BASE_URL", "/media"),
            admin_email,
            admin_password,
            mail_relay_url: env_or("FOLIO_MAIL_RELAY_URL", ""),
            mail_relay_key: env_or("FOLIO_MAIL_RELAY_KEY", ""),
            site_owner: env_or("FOLIO_SITE_OWNER", "Portfolio"),
            contact_inbox: env_or("FOLIO_CONTACT_INBOX", ""),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time sanity: all thresholds are positive.
    #[test]
    fn test_all_thresholds_positive() {
        const _: () = assert!(MAX_LOGIN_ATTEMPTS > 0);
        const _: () = assert!(LOCKOUT_DURATION_SECS > 0);
        const _: () = assert!(COUNTDOWN_TICK_SECS > 0);
        const _: () = assert!(PROJECT_PAGE_SIZE > 0);
    }

    #[test]
    fn test_env_or_falls_back_to_default() {
        assert_eq!(env_or("FOLIO_TEST_UNSET_VARIABLE", "fallback"), "fallback");
    }
}

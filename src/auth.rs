//! Authentication seam and bearer-token session management.
//!
//! The provider contract mirrors a hosted auth service: email + password in,
//! a session carrying a role attribute out. The shipped [`SingleAdmin`]
//! provider knows exactly one account, the admin configured at startup.
//! Sessions live server-side in a [`SessionManager`] and persist until
//! sign-out or process restart.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Role attribute carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Visitor,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

/// Credential verification contract.
pub trait AuthProvider: Send + Sync {
    /// Verify credentials and return the resulting session, or
    /// [`AppError::Auth`] when they do not match any account.
    fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError>;
}

/// Provider backed by the single admin account from settings.
pub struct SingleAdmin {
    email: String,
    password: String,
}

impl SingleAdmin {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl AuthProvider for SingleAdmin {
    fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if email == self.email && password == self.password {
            Ok(Session {
                email: email.to_string(),
                role: Role::Admin,
            })
        } else {
            Err(AppError::Auth("Invalid email or password".into()))
        }
    }
}

/// Issues and resolves opaque bearer tokens for authenticated sessions.
#[derive(Default)]
pub struct SessionManager {
    sessions: DashMap<String, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session and hand back its bearer token.
    pub fn issue(&self, session: Session) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Resolve a bearer token to its session.
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|s| s.clone())
    }

    /// Drop the session for a token. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Resolve a token and require the admin role.
    ///
    /// A valid session without the admin role is revoked on the spot, the
    /// same way the original dashboard signs out non-admin users.
    pub fn require_admin(&self, token: &str) -> Result<Session, AppError> {
        let session = self
            .get(token)
            .ok_or_else(|| AppError::Unauthorized("Not signed in".into()))?;
        if session.role != Role::Admin {
            self.revoke(token);
            return Err(AppError::Unauthorized("Admin role required".into()));
        }
        Ok(session)
    }
}

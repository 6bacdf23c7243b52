//! Sign-in session entity
//!
//! One row per successful sign-in. The session id equals the `jti` of
//! the refresh token issued for it, so revoking a session invalidates
//! exactly the tokens minted under it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::TokenKind;

/// Lifecycle state of a sign-in session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Expired,
    Revoked,
}

/// A single device/browser sign-in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SignInSession {
    /// Session id, equal to the refresh token `jti`
    pub id: Uuid,
    pub user_id: Uuid,

    pub ip: String,
    pub user_agent: String,
    /// Optional opaque client identifier (stored as a digest)
    pub client_token: Option<String>,

    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SignInSession {
    /// Open a new session lasting one refresh-token validity window
    pub fn new(
        user_id: Uuid,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        client_token: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            ip: ip.into(),
            user_agent: user_agent.into(),
            client_token,
            expires_at: now + TokenKind::Refresh.validity(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.deleted_at.is_some() {
            SessionStatus::Revoked
        } else if self.expires_at <= now {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == SessionStatus::Active
    }

    /// Revoke now: the session both ends and expires at this instant
    pub fn revoke(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.expires_at = now;
        self.updated_at = now;
    }

    /// Push expiry out to a full refresh window from now
    pub fn extend(&mut self) {
        let now = Utc::now();
        self.expires_at = now + TokenKind::Refresh.validity();
        self.updated_at = now;
    }
}

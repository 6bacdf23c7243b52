//! Token claims and per-kind lifetime policy

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token kind, carried in the `sub` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// How long a freshly issued token of this kind stays valid
    pub fn validity(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::minutes(30),
            TokenKind::Refresh => Duration::days(7),
        }
    }

    /// How far into the validity window a token must age before a
    /// presentation triggers re-issue
    pub fn refresh_threshold(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::minutes(15),
            TokenKind::Refresh => Duration::days(6),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims set
///
/// `jti` doubles as the sign-in session id: the refresh token and every
/// access token minted from it share the same `jti`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Claims {
    /// Issuer (server name)
    pub iss: String,
    /// Expiry as unix seconds
    pub exp: i64,
    /// Token kind
    pub sub: TokenKind,
    /// Token id, equal to the sign-in session id
    pub jti: Uuid,
    /// Account id
    pub user: Uuid,
    /// User-agent string presented when the token was issued
    pub user_agent: String,
}

impl Claims {
    /// Issue a fresh claims set expiring `kind.validity()` from now
    pub fn new(
        kind: TokenKind,
        issuer: impl Into<String>,
        jti: Uuid,
        user: Uuid,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            iss: issuer.into(),
            exp: (Utc::now() + kind.validity()).timestamp(),
            sub: kind,
            jti,
            user,
            user_agent: user_agent.into(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// When this token was issued, derived from expiry and kind
    pub fn claimed_at(&self) -> DateTime<Utc> {
        self.expires_at() - self.sub.validity()
    }

    /// The instant after which a presentation should trigger re-issue
    pub fn refreshes_at(&self) -> DateTime<Utc> {
        self.claimed_at() + self.sub.refresh_threshold()
    }

    /// Whether the sliding window calls for re-issuing this token
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        now > self.refreshes_at()
    }

    /// Push expiry out to a full validity window from now
    pub fn renew(&mut self) {
        self.exp = (Utc::now() + self.sub.validity()).timestamp();
    }

    /// Derive a fresh access-token claims set from this refresh claims set.
    ///
    /// Keeps jti, user and user-agent; only the kind and expiry change.
    pub fn to_access(&self) -> Self {
        Self {
            iss: self.iss.clone(),
            exp: (Utc::now() + TokenKind::Access.validity()).timestamp(),
            sub: TokenKind::Access,
            jti: self.jti,
            user: self.user,
            user_agent: self.user_agent.clone(),
        }
    }
}

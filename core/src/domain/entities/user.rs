//! User account entity and sign-in gating rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lock reason written when the failure counter trips the threshold.
///
/// Only a lock carrying this exact reason is lifted by a password change;
/// administrative locks stay until an administrator clears them.
pub const LOCK_REASON_TOO_MANY_FAILURES: &str = "too many sign-in failures";

/// Why an account cannot sign in right now
///
/// The variants are ordered by precedence: an unverified email is reported
/// before a deletion, and a deletion before a lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInDisabledReason {
    /// Email address has not been verified yet
    EmailNotVerified,
    /// Account was deleted by its own user
    SelfDeleted { deleted_at: DateTime<Utc> },
    /// Account was deleted by an administrator
    AdminDeleted,
    /// Account is locked
    Locked { reason: String },
}

impl SignInDisabledReason {
    pub fn message(&self) -> String {
        match self {
            SignInDisabledReason::EmailNotVerified => {
                String::from("email address is not verified yet, please check your inbox")
            }
            SignInDisabledReason::SelfDeleted { deleted_at } => format!(
                "this account was closed on {}",
                deleted_at.format("%Y-%m-%d %H:%M UTC")
            ),
            SignInDisabledReason::AdminDeleted => {
                String::from("this account was removed by an administrator")
            }
            SignInDisabledReason::Locked { reason } => {
                format!("this account is locked (reason: {reason})")
            }
        }
    }
}

/// User account
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: Uuid,

    pub username: String,
    pub nickname: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub email_secret: Option<String>,

    /// Argon2id digest in PHC string format
    pub password_hash: String,
    pub password_updated_at: DateTime<Utc>,

    pub last_signin_at: Option<DateTime<Utc>>,
    pub signin_fail_count: u32,
    pub signin_failed_at: Option<DateTime<Utc>>,

    pub locked_at: Option<DateTime<Utc>>,
    pub locked_by: Option<Uuid>,
    pub locked_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl User {
    /// Create a new account with the given credentials
    pub fn new(
        username: impl Into<String>,
        nickname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            nickname: nickname.into(),
            email: email.into(),
            email_verified_at: None,
            email_secret: None,
            password_hash: password_hash.into(),
            password_updated_at: now,
            last_signin_at: None,
            signin_fail_count: 0,
            signin_failed_at: None,
            locked_at: None,
            locked_by: None,
            locked_reason: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// The reason sign-in is currently disabled, if any.
    ///
    /// Checks run in a fixed order: unverified email, then deletion,
    /// then lock. The first match wins.
    pub fn signin_disabled_reason(&self) -> Option<SignInDisabledReason> {
        if self.email_verified_at.is_none() {
            return Some(SignInDisabledReason::EmailNotVerified);
        }
        if let Some(deleted_at) = self.deleted_at {
            if self.deleted_by == Some(self.id) {
                return Some(SignInDisabledReason::SelfDeleted { deleted_at });
            }
            return Some(SignInDisabledReason::AdminDeleted);
        }
        if self.locked_at.is_some() {
            return Some(SignInDisabledReason::Locked {
                reason: self
                    .locked_reason
                    .clone()
                    .unwrap_or_else(|| String::from("unspecified")),
            });
        }
        None
    }

    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// Attempts left before the account locks
    pub fn remaining_signin_attempts(&self, max_failures: u32) -> u32 {
        max_failures.saturating_sub(self.signin_fail_count)
    }

    /// Record a successful sign-in: resets the failure counter and
    /// stamps the last sign-in time.
    pub fn mark_signin_succeeded(&mut self) {
        self.signin_fail_count = 0;
        self.signin_failed_at = None;
        self.last_signin_at = Some(Utc::now());
        self.touch();
    }

    /// Record a failed sign-in attempt. Locks the account once the
    /// counter reaches `max_failures`.
    pub fn mark_signin_failed(&mut self, max_failures: u32) {
        let now = Utc::now();
        self.signin_fail_count += 1;
        self.signin_failed_at = Some(now);
        if self.signin_fail_count >= max_failures {
            self.locked_at = Some(now);
            self.locked_reason = Some(String::from(LOCK_REASON_TOO_MANY_FAILURES));
        }
        self.touch();
    }

    /// Install a new password digest.
    ///
    /// Resets the failure counter and lifts a too-many-failures lock;
    /// any other lock reason is left in place.
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        if self.locked_reason.as_deref() == Some(LOCK_REASON_TOO_MANY_FAILURES) {
            self.locked_at = None;
            self.locked_reason = None;
        }
        self.signin_fail_count = 0;
        self.signin_failed_at = None;
        self.password_hash = password_hash.into();
        self.password_updated_at = Utc::now();
        self.touch();
    }

    /// Mark the email address as verified
    pub fn mark_email_verified(&mut self) {
        self.email_verified_at = Some(Utc::now());
        self.email_secret = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

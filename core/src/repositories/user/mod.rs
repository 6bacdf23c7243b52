//! User persistence: filter, create/update schemas and the [`Entity`]
//! wiring for [`User`]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;

use super::entity::{CreateSchema, Entity, UpdateSchema};

/// Query shape for user rows
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    /// Include soft-deleted accounts
    pub include_deleted: bool,
}

impl UserFilter {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }
}

impl Entity for User {
    type Id = Uuid;
    type Filter = UserFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
        self.deleted_at = at;
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        if !filter.include_deleted && self.deleted_at.is_some() {
            return false;
        }
        if let Some(username) = &filter.username {
            if self.username != *username {
                return false;
            }
        }
        if let Some(nickname) = &filter.nickname {
            if self.nickname != *nickname {
                return false;
            }
        }
        if let Some(email) = &filter.email {
            if !self.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        true
    }

    fn null_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.nickname.is_empty() {
            missing.push("nickname");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        if self.password_hash.is_empty() {
            missing.push("password");
        }
        missing
    }

    fn conflicts_with(&self, other: &Self) -> Option<&'static str> {
        if self.username == other.username {
            Some("username")
        } else if self.nickname == other.nickname {
            Some("nickname")
        } else if self.email.eq_ignore_ascii_case(&other.email) {
            Some("email")
        } else {
            None
        }
    }
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    pub email: String,
    /// Already-hashed password digest
    pub password_hash: String,
    /// Mark the email verified immediately (deployments without a
    /// verification flow)
    pub email_verified: bool,
}

impl CreateSchema<User> for NewUser {
    fn into_entity(self) -> User {
        let mut user = User::new(self.username, self.nickname, self.email, self.password_hash);
        if self.email_verified {
            user.mark_email_verified();
        }
        user
    }

    fn primary_filter(&self) -> UserFilter {
        UserFilter::by_username(self.username.clone())
    }
}

/// Partial account update
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub nickname: Option<String>,
    pub email: Option<String>,
}

impl UpdateSchema<User> for UserPatch {
    fn apply_to(&self, user: &mut User) {
        if let Some(nickname) = &self.nickname {
            user.nickname = nickname.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
            user.email_verified_at = None;
        }
        user.updated_at = Utc::now();
    }
}

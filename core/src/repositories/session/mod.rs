//! Sign-in session persistence wiring

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::SignInSession;

use super::entity::{CreateSchema, Entity};

/// Query shape for session rows
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub user_id: Option<Uuid>,
    /// Only sessions that are neither revoked nor expired
    pub active_only: bool,
    pub include_deleted: bool,
}

impl SessionFilter {
    pub fn active_for(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            active_only: true,
            include_deleted: false,
        }
    }
}

impl Entity for SignInSession {
    type Id = Uuid;
    type Filter = SessionFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
        self.deleted_at = at;
    }

    fn matches(&self, filter: &SessionFilter) -> bool {
        if !filter.include_deleted && self.deleted_at.is_some() {
            return false;
        }
        if let Some(user_id) = filter.user_id {
            if self.user_id != user_id {
                return false;
            }
        }
        if filter.active_only && !self.is_active(Utc::now()) {
            return false;
        }
        true
    }

    fn null_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ip.is_empty() {
            missing.push("ip");
        }
        if self.user_agent.is_empty() {
            missing.push("user_agent");
        }
        missing
    }
}

/// Input for opening a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub ip: String,
    pub user_agent: String,
    pub client_token: Option<String>,
}

impl CreateSchema<SignInSession> for NewSession {
    fn into_entity(self) -> SignInSession {
        SignInSession::new(self.user_id, self.ip, self.user_agent, self.client_token)
    }

    fn primary_filter(&self) -> SessionFilter {
        SessionFilter {
            user_id: Some(self.user_id),
            active_only: true,
            include_deleted: false,
        }
    }
}

//! Shared application state

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::revocation::RevocationCache;
use ambry_core::services::AuthService;
use ambry_shared::config::AppConfig;

use ambry_infra::cache::RedisRevocationCache;
use ambry_infra::database::{MySqlSessionStore, MySqlUserStore};

/// Everything the handlers need, generic over the persistence backends
/// so tests can swap in memory-backed stores.
pub struct AppState<US, SS, RC>
where
    US: EntityStore<User>,
    SS: EntityStore<SignInSession>,
    RC: RevocationCache,
{
    pub auth: AuthService<US, SS, RC>,
    pub config: AppConfig,
}

impl<US, SS, RC> AppState<US, SS, RC>
where
    US: EntityStore<User>,
    SS: EntityStore<SignInSession>,
    RC: RevocationCache,
{
    pub fn new(auth: AuthService<US, SS, RC>, config: AppConfig) -> Self {
        Self { auth, config }
    }
}

/// The state `main` builds for a real deployment
pub type ProductionState = AppState<MySqlUserStore, MySqlSessionStore, RedisRevocationCache>;

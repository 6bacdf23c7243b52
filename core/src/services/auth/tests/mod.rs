//! Auth service tests over in-memory backends

mod refresh;
mod signin;

use std::sync::Arc;

use ambry_shared::config::AuthConfig;

use crate::domain::entities::session::SignInSession;
use crate::domain::entities::user::User;
use crate::repositories::memory::MemoryStore;
use crate::repositories::revocation::MockRevocationCache;

use super::service::{AuthService, RegisterInput, SignInInput};

pub(super) const AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub(super) const CSRF: &str = "csrf-cookie-value";
pub(super) const PASSWORD: &str = "Correct-Horse-7";

pub(super) type TestAuthService =
    AuthService<MemoryStore<User>, MemoryStore<SignInSession>, MockRevocationCache>;

pub(super) struct Harness {
    pub service: TestAuthService,
    pub users: Arc<MemoryStore<User>>,
    pub sessions: Arc<MemoryStore<SignInSession>>,
}

pub(super) fn harness() -> Harness {
    let users = Arc::new(MemoryStore::new());
    let sessions = Arc::new(MemoryStore::new());
    let revocation = Arc::new(MockRevocationCache::new());
    let config = AuthConfig {
        secret_key: String::from("test-secret"),
        issuer: String::from("ambry"),
        max_signin_failures: 5,
        require_email_verification: false,
    };
    let service = AuthService::new(
        Arc::clone(&users),
        Arc::clone(&sessions),
        revocation,
        &config,
    );
    Harness {
        service,
        users,
        sessions,
    }
}

pub(super) fn register_input(username: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_string(),
        nickname: format!("{username}-nick"),
        email: format!("{username}@example.com"),
        password: PASSWORD.to_string(),
        password_confirm: PASSWORD.to_string(),
    }
}

pub(super) fn signin_input(identifier: &str) -> SignInInput {
    SignInInput {
        identifier: identifier.to_string(),
        password: PASSWORD.to_string(),
        ip: String::from("127.0.0.1"),
        user_agent: AGENT.to_string(),
        client_token: None,
    }
}

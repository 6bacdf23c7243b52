//! The auth service ties the codec, the password service, the stores
//! and the revocation cache into the sign-in lifecycle.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use uuid::Uuid;

use ambry_shared::config::AuthConfig;
use ambry_shared::utils::validation;

use crate::domain::entities::session::SignInSession;
use crate::domain::entities::token::{Claims, TokenKind};
use crate::domain::entities::user::User;
use crate::errors::{AuthnError, DomainError, DomainResult, ValidationError};
use crate::repositories::entity::EntityStore;
use crate::repositories::revocation::RevocationCache;
use crate::repositories::session::{NewSession, SessionFilter};
use crate::repositories::user::{NewUser, UserFilter};
use crate::repositories::CrudRepository;
use crate::services::password::PasswordService;
use crate::services::token::TokenCodec;

/// Registration input, already shape-checked at the API boundary
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Sign-in input
#[derive(Debug, Clone)]
pub struct SignInInput {
    /// Username, `@username`, or email address
    pub identifier: String,
    pub password: String,
    pub ip: String,
    pub user_agent: String,
    pub client_token: Option<String>,
}

/// Everything a successful sign-in produces
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub user: User,
    pub session: SignInSession,
    pub access_token: String,
    pub refresh_token: String,
}

/// A re-issued refresh token and its new expiry, for the cookie
#[derive(Debug, Clone)]
pub struct RotatedRefresh {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of presenting a refresh token
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub access_token: String,
    /// Present only when the sliding window rotated the refresh token
    pub rotated: Option<RotatedRefresh>,
}

/// Authentication service generic over its persistence backends
pub struct AuthService<US, SS, RC>
where
    US: EntityStore<User>,
    SS: EntityStore<SignInSession>,
    RC: RevocationCache,
{
    users: CrudRepository<User, US>,
    sessions: CrudRepository<SignInSession, SS>,
    revocation: Arc<RC>,
    codec: TokenCodec,
    passwords: PasswordService,
    max_signin_failures: u32,
    require_email_verification: bool,
}

impl<US, SS, RC> AuthService<US, SS, RC>
where
    US: EntityStore<User>,
    SS: EntityStore<SignInSession>,
    RC: RevocationCache,
{
    pub fn new(users: Arc<US>, sessions: Arc<SS>, revocation: Arc<RC>, config: &AuthConfig) -> Self {
        Self {
            users: CrudRepository::new(users),
            sessions: CrudRepository::new(sessions),
            revocation,
            codec: TokenCodec::new(&config.secret_key, &config.issuer),
            passwords: PasswordService::new(),
            max_signin_failures: config.max_signin_failures,
            require_email_verification: config.require_email_verification,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Marker TTL: one full refresh-validity window, after which the
    /// tokens expire on their own
    fn revocation_ttl() -> StdDuration {
        TokenKind::Refresh
            .validity()
            .to_std()
            .unwrap_or(StdDuration::from_secs(7 * 24 * 3600))
    }

    /// Create an account.
    ///
    /// All violated rules are reported together; the email arrives
    /// pre-verified unless the deployment runs a verification flow.
    pub async fn register(&self, input: RegisterInput) -> DomainResult<User> {
        let mut errors: Vec<DomainError> = Vec::new();

        if let Err(issues) = validation::validate_username(&input.username) {
            errors.extend(DomainError::from_username_issues(issues).into_vec());
        }
        if !validation::is_email(&input.email) {
            errors.push(DomainError::Validation(ValidationError::InvalidEmail));
        }
        if let Err(err) = self.passwords.vet_new_password(
            &input.password,
            &input.password_confirm,
            &[&input.username, &input.nickname, &input.email],
        ) {
            errors.extend(err.into_vec());
        }
        if !errors.is_empty() {
            return Err(DomainError::multiple(errors));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        self.users
            .create(NewUser {
                username: input.username,
                nickname: input.nickname,
                email: input.email,
                password_hash,
                email_verified: !self.require_email_verification,
            })
            .await
    }

    fn identifier_filter(identifier: &str) -> UserFilter {
        let mut filter = if let Some(username) = identifier.strip_prefix('@') {
            UserFilter::by_username(username)
        } else if validation::is_email(identifier) {
            UserFilter::by_email(identifier)
        } else {
            UserFilter::by_username(identifier)
        };
        // deleted accounts must still be found so the disabled reason
        // can be reported
        filter.include_deleted = true;
        filter
    }

    /// Sign in and open a session.
    pub async fn sign_in(&self, input: SignInInput, csrf_token: &str) -> DomainResult<SignInOutcome> {
        let filter = Self::identifier_filter(&input.identifier);
        let mut user = self
            .users
            .get_by(&filter)
            .await?
            .ok_or(DomainError::Authn(AuthnError::SignInUserNotFound))?;

        if let Some(reason) = user.signin_disabled_reason() {
            return Err(DomainError::Authn(AuthnError::SignInDisabled(reason)));
        }

        if !self.passwords.verify(&input.password, &user.password_hash)? {
            user.mark_signin_failed(self.max_signin_failures);
            let remaining = user.remaining_signin_attempts(self.max_signin_failures);
            let disabled = user.signin_disabled_reason();
            self.users.store().persist(user).await?;
            return Err(match disabled {
                Some(reason) => DomainError::Authn(AuthnError::SignInDisabled(reason)),
                None => DomainError::Authn(AuthnError::WrongPasswordWithWarning { remaining }),
            });
        }

        user.mark_signin_succeeded();
        let user = self.users.store().persist(user).await?;

        let session = self
            .sessions
            .create(NewSession {
                user_id: user.id,
                ip: input.ip,
                user_agent: input.user_agent.clone(),
                client_token: input
                    .client_token
                    .map(|t| format!("{:x}", Sha256::digest(t.as_bytes()))),
            })
            .await?;

        let refresh_claims = Claims::new(
            TokenKind::Refresh,
            self.codec.issuer(),
            session.id,
            user.id,
            input.user_agent,
        );
        let refresh_token = self.codec.encode_refresh(&refresh_claims)?;
        let access_token = self
            .codec
            .encode_access(&refresh_claims.to_access(), csrf_token)?;

        Ok(SignInOutcome {
            user,
            session,
            access_token,
            refresh_token,
        })
    }

    /// Decode an access token and check it against the revocation cache
    pub async fn verify_access(
        &self,
        token: &str,
        csrf_token: &str,
        user_agent: &str,
    ) -> DomainResult<Claims> {
        let claims = self.codec.decode_access(token, csrf_token, user_agent)?;
        if self.revocation.is_revoked(claims.jti).await? {
            return Err(DomainError::Authn(AuthnError::InvalidAccessToken));
        }
        Ok(claims)
    }

    /// Decode a refresh token and check it against the revocation cache
    pub async fn verify_refresh(&self, token: &str, user_agent: &str) -> DomainResult<Claims> {
        let claims = self.codec.decode_refresh(token, user_agent)?;
        if self.revocation.is_revoked(claims.jti).await? {
            return Err(DomainError::Authn(AuthnError::InvalidRefreshToken));
        }
        Ok(claims)
    }

    /// End the presenting session: revoke its row and write the marker
    pub async fn sign_out(&self, claims: &Claims) -> DomainResult<()> {
        if let Some(mut session) = self.sessions.store().fetch(&claims.jti).await? {
            if session.deleted_at.is_none() {
                session.revoke();
                self.sessions.store().persist(session).await?;
            }
        }
        self.revocation
            .mark_revoked(claims.jti, Self::revocation_ttl())
            .await
    }

    /// Present a refresh token: always mints a fresh access token, and
    /// rotates the refresh token once it has aged past its threshold.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        csrf_token: &str,
        user_agent: &str,
    ) -> DomainResult<RefreshOutcome> {
        let mut claims = self.verify_refresh(refresh_token, user_agent).await?;

        let rotated = if claims.should_refresh(Utc::now()) {
            let mut session = self
                .sessions
                .store()
                .fetch(&claims.jti)
                .await?
                .filter(|s| s.is_active(Utc::now()))
                .ok_or(DomainError::Authn(AuthnError::HistoryNotFound))?;

            session.extend();
            let session = self.sessions.store().persist(session).await?;

            claims.renew();
            Some(RotatedRefresh {
                token: self.codec.encode_refresh(&claims)?,
                expires_at: session.expires_at,
            })
        } else {
            None
        };

        let access_token = self.codec.encode_access(&claims.to_access(), csrf_token)?;
        Ok(RefreshOutcome {
            access_token,
            rotated,
        })
    }

    /// Active sessions for the bearer, newest sign-in first is the
    /// store's natural order
    pub async fn list_sessions(&self, claims: &Claims) -> DomainResult<Vec<SignInSession>> {
        self.sessions
            .list(&SessionFilter::active_for(claims.user), 0, None)
            .await
    }

    /// Revoke another session belonging to the bearer.
    ///
    /// The presenting session must be ended through sign-out instead,
    /// and sessions of other users read as not found.
    pub async fn revoke_session(&self, claims: &Claims, session_id: Uuid) -> DomainResult<()> {
        if session_id == claims.jti {
            return Err(DomainError::Authn(AuthnError::SelfRevokeNotAllowed));
        }

        let mut session = self
            .sessions
            .store()
            .fetch(&session_id)
            .await?
            .filter(|s| s.deleted_at.is_none() && s.user_id == claims.user)
            .ok_or(DomainError::Authn(AuthnError::HistoryNotFound))?;

        session.revoke();
        self.sessions.store().persist(session).await?;
        self.revocation
            .mark_revoked(session_id, Self::revocation_ttl())
            .await
    }

    /// Change the bearer's password.
    ///
    /// Clears the failure counter and lifts a too-many-failures lock as
    /// a side effect of installing the new digest.
    pub async fn change_password(
        &self,
        claims: &Claims,
        original: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> DomainResult<User> {
        let mut user = self
            .users
            .get_any(&claims.user)
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(DomainError::Authn(AuthnError::UserNotFound))?;

        if !self.passwords.verify(original, &user.password_hash)? {
            return Err(DomainError::Authn(AuthnError::PasswordChangeWrongPassword));
        }
        self.passwords.vet_new_password(
            new_password,
            new_password_confirm,
            &[&user.username, &user.nickname, &user.email],
        )?;

        let password_hash = self.passwords.hash(new_password)?;
        user.set_password_hash(password_hash);
        self.users.store().persist(user).await
    }
}

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::SignInSession;
use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{AuthnError, DomainError};
use crate::repositories::entity::EntityStore;

use super::{harness, register_input, signin_input, Harness, AGENT, CSRF};

/// Refresh claims old enough to sit past the six-day rotation
/// threshold while staying valid, with a matching session row.
async fn aged_refresh(h: &Harness, user_id: Uuid) -> (String, Uuid) {
    let mut claims = Claims::new(TokenKind::Refresh, "ambry", Uuid::new_v4(), user_id, AGENT);
    claims.exp = (Utc::now() + Duration::hours(12)).timestamp();

    let mut session = SignInSession::new(user_id, "127.0.0.1", AGENT, None);
    session.id = claims.jti;
    session.expires_at = claims.expires_at();
    h.sessions.insert(session).await.unwrap();

    let token = h.service.codec().encode_refresh(&claims).unwrap();
    (token, claims.jti)
}

#[tokio::test]
async fn test_fresh_refresh_mints_access_only() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();
    let outcome = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap();

    let refreshed = h
        .service
        .refresh(&outcome.refresh_token, CSRF, AGENT)
        .await
        .unwrap();
    assert!(refreshed.rotated.is_none());

    let claims = h
        .service
        .verify_access(&refreshed.access_token, CSRF, AGENT)
        .await
        .unwrap();
    assert_eq!(claims.jti, outcome.session.id);
}

#[tokio::test]
async fn test_aged_refresh_rotates_token_and_extends_session() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();
    let (token, jti) = aged_refresh(&h, user.id).await;

    let refreshed = h.service.refresh(&token, CSRF, AGENT).await.unwrap();
    let rotated = refreshed.rotated.expect("token should rotate");

    // session pushed out to a full window again
    let session = h.sessions.fetch(&jti).await.unwrap().unwrap();
    assert!(session.expires_at > Utc::now() + Duration::days(6));
    assert_eq!(rotated.expires_at, session.expires_at);

    // the rotated token carries the same session id with a new expiry
    let claims = h.service.verify_refresh(&rotated.token, AGENT).await.unwrap();
    assert_eq!(claims.jti, jti);
    assert!(!claims.should_refresh(Utc::now()));
}

#[tokio::test]
async fn test_aged_refresh_without_live_session_fails() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();
    let (token, jti) = aged_refresh(&h, user.id).await;

    let mut session = h.sessions.fetch(&jti).await.unwrap().unwrap();
    session.revoke();
    h.sessions.persist(session).await.unwrap();

    let err = h.service.refresh(&token, CSRF, AGENT).await.unwrap_err();
    assert_eq!(err, DomainError::Authn(AuthnError::HistoryNotFound));
}

#[tokio::test]
async fn test_refresh_after_sign_out_fails() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();
    let outcome = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap();

    let claims = h
        .service
        .verify_access(&outcome.access_token, CSRF, AGENT)
        .await
        .unwrap();
    h.service.sign_out(&claims).await.unwrap();

    let err = h
        .service
        .refresh(&outcome.refresh_token, CSRF, AGENT)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Authn(AuthnError::InvalidRefreshToken));
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();
    let outcome = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap();

    let err = h
        .service
        .refresh(&outcome.access_token, CSRF, AGENT)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Authn(AuthnError::InvalidRefreshToken));
}

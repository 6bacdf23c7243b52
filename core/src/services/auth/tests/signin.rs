use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::token::TokenKind;
use crate::errors::{AuthnError, DomainError};
use crate::repositories::entity::EntityStore;

use super::{harness, register_input, signin_input, AGENT, CSRF};

#[tokio::test]
async fn test_register_then_sign_in() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();
    assert!(user.email_verified_at.is_some());

    let outcome = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap();
    assert_eq!(outcome.user.id, user.id);
    assert!(outcome.session.is_active(Utc::now()));

    let claims = h
        .service
        .verify_access(&outcome.access_token, CSRF, AGENT)
        .await
        .unwrap();
    assert_eq!(claims.user, user.id);
    assert_eq!(claims.jti, outcome.session.id);
    assert_eq!(claims.sub, TokenKind::Access);
}

#[tokio::test]
async fn test_sign_in_by_email_and_at_prefix() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();

    assert!(h
        .service
        .sign_in(signin_input("some-user@example.com"), CSRF)
        .await
        .is_ok());
    assert!(h
        .service
        .sign_in(signin_input("@some-user"), CSRF)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unknown_identifier() {
    let h = harness();
    let err = h
        .service
        .sign_in(signin_input("nobody-here"), CSRF)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Authn(AuthnError::SignInUserNotFound));
}

#[tokio::test]
async fn test_wrong_password_warns_with_remaining_attempts() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();

    let mut input = signin_input("some-user");
    input.password = String::from("Wrong-Horse-7");
    let err = h.service.sign_in(input, CSRF).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Authn(AuthnError::WrongPasswordWithWarning { remaining: 4 })
    );
}

#[tokio::test]
async fn test_account_locks_after_five_failures() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();

    for _ in 0..4 {
        let mut input = signin_input("some-user");
        input.password = String::from("Wrong-Horse-7");
        h.service.sign_in(input, CSRF).await.unwrap_err();
    }

    let mut input = signin_input("some-user");
    input.password = String::from("Wrong-Horse-7");
    let err = h.service.sign_in(input, CSRF).await.unwrap_err();
    assert_eq!(err.details()[0].kind, "ACCOUNT_LOCKED");

    // the right password no longer helps
    let err = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap_err();
    assert_eq!(err.details()[0].kind, "ACCOUNT_LOCKED");
}

#[tokio::test]
async fn test_successful_sign_in_resets_failure_counter() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();

    for _ in 0..3 {
        let mut input = signin_input("some-user");
        input.password = String::from("Wrong-Horse-7");
        h.service.sign_in(input, CSRF).await.unwrap_err();
    }
    h.service.sign_in(signin_input("some-user"), CSRF).await.unwrap();

    let stored = h.users.fetch(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.signin_fail_count, 0);
    assert!(stored.last_signin_at.is_some());
}

#[tokio::test]
async fn test_deleted_account_reports_disabled_reason() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();

    let mut stored = h.users.fetch(&user.id).await.unwrap().unwrap();
    stored.deleted_at = Some(Utc::now());
    stored.deleted_by = Some(user.id);
    h.users.persist(stored).await.unwrap();

    let err = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap_err();
    assert_eq!(err.details()[0].kind, "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_deletion_outranks_lock() {
    let h = harness();
    let user = h.service.register(register_input("some-user")).await.unwrap();

    let mut stored = h.users.fetch(&user.id).await.unwrap().unwrap();
    stored.deleted_at = Some(Utc::now());
    stored.deleted_by = Some(Uuid::new_v4());
    stored.locked_at = Some(Utc::now());
    stored.locked_reason = Some(String::from("terms violation"));
    h.users.persist(stored).await.unwrap();

    let err = h
        .service
        .sign_in(signin_input("some-user"), CSRF)
        .await
        .unwrap_err();
    assert_eq!(err.details()[0].kind, "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_register_aggregates_all_violations() {
    let h = harness();
    let err = h
        .service
        .register(super::super::service::RegisterInput {
            username: String::from("a!"),
            nickname: String::from("nick"),
            email: String::from("not-an-email"),
            password: String::from("short"),
            password_confirm: String::from("different"),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 422);
    let kinds: Vec<_> = err.details().into_iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&"USERNAME_TOO_SHORT".to_string()));
    assert!(kinds.contains(&"USERNAME_CONTAINS_INVALID_CHAR".to_string()));
    assert!(kinds.contains(&"INVALID_EMAIL".to_string()));
    assert!(kinds.contains(&"PASSWORD_TOO_SHORT".to_string()));
    assert!(kinds.contains(&"PASSWORD_CONFIRM_MISMATCH".to_string()));
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let h = harness();
    h.service.register(register_input("some-user")).await.unwrap();

    let mut dup = register_input("some-user");
    dup.email = String::from("other@example.com");
    dup.nickname = String::from("other-nick");
    let err = h.service.register(dup).await.unwrap_err();
    assert_eq!(err.details()[0].kind, "DB_UNIQUE_CONSTRAINT_ERROR");
}

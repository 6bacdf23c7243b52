//! End-to-end exercises of the `/authn` routes over memory-backed
//! stores.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use ambry_api::{app, AppState};
use ambry_core::domain::entities::session::SignInSession;
use ambry_core::domain::entities::user::User;
use ambry_core::repositories::{MemoryStore, MockRevocationCache};
use ambry_core::services::AuthService;
use ambry_shared::config::AppConfig;

type TestState = AppState<MemoryStore<User>, MemoryStore<SignInSession>, MockRevocationCache>;

const AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const CSRF: &str = "csrf-cookie-value";
const PASSWORD: &str = "Correct-Horse-7";

fn test_state() -> web::Data<TestState> {
    let config = AppConfig::default();
    let auth = AuthService::new(
        Arc::new(MemoryStore::<User>::new()),
        Arc::new(MemoryStore::<SignInSession>::new()),
        Arc::new(MockRevocationCache::new()),
        &config.auth,
    );
    web::Data::new(AppState::new(auth, config))
}

macro_rules! init_app {
    () => {
        test::init_service(App::new().app_data(test_state()).configure(
            app::configure::<MemoryStore<User>, MemoryStore<SignInSession>, MockRevocationCache>,
        ))
        .await
    };
}

/// Register an account and sign in, returning the access token and the
/// refresh cookie value.
macro_rules! sign_in {
    ($app:expr, $username:expr) => {{
        let resp = test::call_service(&$app, signup_request($username).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = test::call_service(&$app, signin_request($username).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let refresh = cookie_value(&resp, "refresh_token").expect("refresh cookie");
        let body: Value = test::read_body_json(resp).await;
        let access = body["access_token"].as_str().expect("access token").to_string();
        (access, refresh)
    }};
}

fn signup_request(username: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/authn/signup/")
        .set_json(json!({
            "username": username,
            "nickname": format!("{username}-nick"),
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
            "password_confirm": PASSWORD,
        }))
}

fn signin_request(username: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/authn/signin/")
        .insert_header((header::USER_AGENT, AGENT))
        .cookie(Cookie::new("csrf_token", CSRF))
        .set_form([("username", username), ("password", PASSWORD)])
}

fn authed(req: test::TestRequest, access: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {access}")))
        .insert_header((header::USER_AGENT, AGENT))
        .cookie(Cookie::new("csrf_token", CSRF))
}

fn cookie_value(resp: &ServiceResponse, name: &str) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

fn detail_types(body: &Value) -> Vec<String> {
    body["detail"]
        .as_array()
        .expect("detail array")
        .iter()
        .map(|d| d["type"].as_str().expect("type").to_string())
        .collect()
}

#[actix_rt::test]
async fn test_health_is_up() {
    let app = init_app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_csrf_bootstrap_issues_cookie_once() {
    let app = init_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::with_uri("/authn/csrf/")
            .method(actix_web::http::Method::HEAD)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(cookie_value(&resp, "csrf_token").is_some());

    // a returning client keeps its cookie
    let resp = test::call_service(
        &app,
        test::TestRequest::with_uri("/authn/csrf/")
            .method(actix_web::http::Method::HEAD)
            .cookie(Cookie::new("csrf_token", CSRF))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(cookie_value(&resp, "csrf_token").is_none());

    // unless it asks for a fresh one
    let resp = test::call_service(
        &app,
        test::TestRequest::with_uri("/authn/csrf/?force=true")
            .method(actix_web::http::Method::HEAD)
            .cookie(Cookie::new("csrf_token", CSRF))
            .to_request(),
    )
    .await;
    let reissued = cookie_value(&resp, "csrf_token").expect("reissued cookie");
    assert_ne!(reissued, CSRF);
}

#[actix_rt::test]
async fn test_signup_returns_user_dto() {
    let app = init_app!();
    let resp = test::call_service(&app, signup_request("ada").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["email_verified"], true);
}

#[actix_rt::test]
async fn test_signup_reports_every_violation_at_once() {
    let app = init_app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/authn/signup/")
            .set_json(json!({
                "username": "ab",
                "nickname": "ab-nick",
                "email": "not-an-email",
                "password": "short",
                "password_confirm": "short",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    let types = detail_types(&body);
    assert!(types.contains(&"USERNAME_TOO_SHORT".to_string()));
    assert!(types.contains(&"INVALID_EMAIL".to_string()));
    assert!(types.contains(&"PASSWORD_TOO_SHORT".to_string()));
}

#[actix_rt::test]
async fn test_signin_sets_refresh_cookie_and_returns_bearer() {
    let app = init_app!();
    let resp = test::call_service(&app, signup_request("ada").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, signin_request("ada").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(cookie_value(&resp, "refresh_token").is_some());
    // the client already held a csrf cookie, none is minted
    assert!(cookie_value(&resp, "csrf_token").is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn test_signin_without_csrf_cookie_mints_one() {
    let app = init_app!();
    test::call_service(&app, signup_request("ada").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/authn/signin/")
            .insert_header((header::USER_AGENT, AGENT))
            .set_form([("username", "ada"), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(cookie_value(&resp, "csrf_token").is_some());
}

#[actix_rt::test]
async fn test_signin_wrong_password_carries_remaining_attempts() {
    let app = init_app!();
    test::call_service(&app, signup_request("ada").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/authn/signin/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("csrf_token", CSRF))
            .set_form([("username", "ada"), ("password", "Wrong-Password-1")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "SIGNIN_WRONG_PASSWORD_WITH_WARNING");
    assert_eq!(body["detail"][0]["ctx"]["remaining_attempts"], 4);
}

#[actix_rt::test]
async fn test_verify_accepts_live_token_and_rejects_after_signout() {
    let app = init_app!();
    let (access, _refresh) = sign_in!(app, "ada");

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::put().uri("/authn/verify/"), &access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "ok");

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::delete().uri("/authn/signout/"), &access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::put().uri("/authn/verify/"), &access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "INVALID_ACCESS_TOKEN");
}

#[actix_rt::test]
async fn test_verify_without_bearer_is_unauthorized() {
    let app = init_app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/authn/verify/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("csrf_token", CSRF))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_refresh_returns_fresh_access_token() {
    let app = init_app!();
    let (_access, refresh) = sign_in!(app, "ada");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/authn/refresh/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("csrf_token", CSRF))
            .cookie(Cookie::new("refresh_token", refresh))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    // a fresh refresh token is not rotated
    assert!(cookie_value(&resp, "refresh_token").is_none());
    let body: Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn test_refresh_without_csrf_requires_signin() {
    let app = init_app!();
    let (_access, refresh) = sign_in!(app, "ada");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/authn/refresh/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("refresh_token", refresh))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "SIGNIN_REQUIRED");
}

#[actix_rt::test]
async fn test_refresh_without_cookie_is_invalid() {
    let app = init_app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/authn/refresh/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("csrf_token", CSRF))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "INVALID_REFRESH_TOKEN");
    assert_eq!(body["detail"][0]["loc"], json!(["cookie", "refresh_token"]));
}

#[actix_rt::test]
async fn test_history_lists_and_revokes_other_sessions() {
    let app = init_app!();
    let (_first, _) = sign_in!(app, "ada");

    // second sign-in from the same account
    let resp = test::call_service(&app, signin_request("ada").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let access = body["access_token"].as_str().expect("access token").to_string();

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/authn/history/"), &access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let sessions: Value = test::read_body_json(resp).await;
    let sessions = sessions.as_array().expect("session array").clone();
    assert_eq!(sessions.len(), 2);

    let current_id = sessions
        .iter()
        .find(|s| s["current"] == true)
        .expect("current session")["id"]
        .as_str()
        .expect("id")
        .to_string();
    let other_id = sessions
        .iter()
        .find(|s| s["current"] == false)
        .expect("other session")["id"]
        .as_str()
        .expect("id")
        .to_string();

    // the presenting session cannot revoke itself here
    let resp = test::call_service(
        &app,
        authed(
            test::TestRequest::delete().uri(&format!("/authn/history/{current_id}")),
            &access,
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "SELF_REVOKE_NOT_ALLOWED");

    let resp = test::call_service(
        &app,
        authed(
            test::TestRequest::delete().uri(&format!("/authn/history/{other_id}")),
            &access,
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/authn/history/"), &access).to_request(),
    )
    .await;
    let sessions: Value = test::read_body_json(resp).await;
    assert_eq!(sessions.as_array().expect("session array").len(), 1);
}

#[actix_rt::test]
async fn test_update_password_swaps_the_credential() {
    let app = init_app!();
    let (access, _) = sign_in!(app, "ada");

    let resp = test::call_service(
        &app,
        authed(test::TestRequest::post().uri("/authn/update-password/"), &access)
            .set_json(json!({
                "current_password": PASSWORD,
                "new_password": "Fresh-Stable-9",
                "new_password_confirm": "Fresh-Stable-9",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "ada");

    // the old password no longer signs in
    let resp = test::call_service(&app, signin_request("ada").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/authn/signin/")
            .insert_header((header::USER_AGENT, AGENT))
            .cookie(Cookie::new("csrf_token", CSRF))
            .set_form([("username", "ada"), ("password", "Fresh-Stable-9")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_unknown_route_is_structured_not_found() {
    let app = init_app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/nowhere").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "RESOURCE_NOT_FOUND");
}

#[actix_rt::test]
async fn test_malformed_json_body_is_bad_request() {
    let app = init_app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/authn/signup/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"][0]["type"], "REQUEST_BODY_INVALID");
}

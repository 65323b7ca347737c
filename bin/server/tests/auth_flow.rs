//! Login, session, and logout over HTTP.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use clubee_platform_access::{
    ExpiryPolicy, LoginLogEntry, LoginLogStore, StoreError, UserStore,
    memory::InMemoryLoginLogStore,
};
use clubee_server::auth::AuthSettings;
use common::{CLIENT_URL, STATE, cookie_pair, json_body, location, set_cookie, test_app};
use rootcause::Report;

#[tokio::test]
async fn root_reports_running() {
    let app = test_app();
    let response = app.get("/", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&body[..], b"Clubee Backend is running.");
}

#[tokio::test]
async fn login_redirects_to_provider_with_auth_state_cookie() {
    let app = test_app();
    let response = app.get("/auth/google", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some(format!("https://accounts.example/auth?state={STATE}").as_str())
    );
    let cookie = set_cookie(&response, "auth_state").expect("auth_state cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=600"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn successful_callback_creates_user_session_and_audit_entry() {
    let app = test_app();
    let started = Utc::now();

    let auth_state = app.begin_login().await;
    let response = app
        .callback(&format!("code=good&state={STATE}"), Some(&auth_state))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(CLIENT_URL));

    let session_cookie = set_cookie(&response, "clubee.sid").expect("session cookie");
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("Path=/"));
    assert!(session_cookie.contains("Max-Age=604800"));
    assert!(session_cookie.contains("SameSite=Lax"));
    assert!(!session_cookie.contains("Secure"));
    assert_eq!(app.sessions.len().await, 1);

    let user = app
        .users
        .find_by_subject("g-100")
        .await
        .expect("lookup")
        .expect("user created");
    assert_eq!(user.display_name(), "Ana Souza");
    assert_eq!(user.email(), Some("ana@example.com"));
    assert_eq!(user.photo(), Some("https://lh3.example/ana.jpg"));

    let logins = app.login_log.recent().await.expect("logins");
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].user_id, user.id());
    assert_eq!(logins[0].email.as_deref(), Some("ana@example.com"));
    assert!(logins[0].date >= started);
}

#[tokio::test]
async fn repeat_login_reuses_the_same_user() {
    let app = test_app();

    let first = app.sign_in("good").await;
    let second = app.sign_in("good").await;

    assert_ne!(first, second);
    assert_eq!(app.users.len().await, 1);
    assert_eq!(app.login_log.recent().await.expect("logins").len(), 2);
}

#[tokio::test]
async fn user_without_email_is_logged_without_email() {
    let app = test_app();
    app.sign_in("other").await;

    let logins = app.login_log.recent().await.expect("logins");
    assert_eq!(logins.len(), 1);
    assert!(logins[0].email.is_none());
}

async fn assert_failed_login(app: &common::TestApp, response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login/failed"));
    assert!(set_cookie(&response, "clubee.sid").is_none());
    assert!(app.users.is_empty().await);
    assert!(app.sessions.is_empty().await);
    assert!(app.login_log.recent().await.expect("logins").is_empty());
}

#[tokio::test]
async fn state_mismatch_fails_login() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback("code=good&state=forged", Some(&auth_state))
        .await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn missing_auth_state_cookie_fails_login() {
    let app = test_app();

    let response = app.callback(&format!("code=good&state={STATE}"), None).await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn provider_denial_fails_login() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback(&format!("error=access_denied&state={STATE}"), Some(&auth_state))
        .await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn missing_code_fails_login() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback(&format!("state={STATE}"), Some(&auth_state))
        .await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn provider_error_fails_login() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback(&format!("code=bad&state={STATE}"), Some(&auth_state))
        .await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn provider_timeout_fails_login() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback(&format!("code=slow&state={STATE}"), Some(&auth_state))
        .await;

    assert_failed_login(&app, response).await;
}

#[tokio::test]
async fn callback_clears_auth_state_cookie() {
    let app = test_app();
    let auth_state = app.begin_login().await;

    let response = app
        .callback(&format!("code=good&state={STATE}"), Some(&auth_state))
        .await;

    let cleared = set_cookie(&response, "auth_state").expect("auth_state removal");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn login_failed_is_unauthorized_json() {
    let app = test_app();
    let response = app.get("/login/failed", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn me_without_session_is_unauthenticated() {
    let app = test_app();
    let response = app.get("/api/user/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Não autenticado");
}

#[tokio::test]
async fn me_with_session_returns_the_user() {
    let app = test_app();
    let cookie = app.sign_in("good").await;
    let user = app
        .users
        .find_by_subject("g-100")
        .await
        .expect("lookup")
        .expect("user");

    let response = app.get("/api/user/me", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], user.id().to_string());
    assert_eq!(body["user"]["googleId"], "g-100");
    assert_eq!(body["user"]["displayName"], "Ana Souza");
}

#[tokio::test]
async fn unsigned_session_cookie_is_ignored() {
    let app = test_app();
    let signed = app.sign_in("good").await;
    // Strip the signature prefix and present the bare session id.
    let value = signed.trim_start_matches("clubee.sid=");
    let bare = value
        .find("sess_")
        .map(|at| format!("clubee.sid={}", &value[at..]))
        .expect("session id in cookie");

    let response = app.get("/api/user/me", Some(&bare)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_destroys_session_and_clears_cookie() {
    let app = test_app();
    let cookie = app.sign_in("good").await;

    let response = app.get("/auth/logout", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(CLIENT_URL));
    let cleared = set_cookie(&response, "clubee.sid").expect("cleared cookie");
    assert!(cleared.contains("Max-Age=0"));
    assert!(app.sessions.is_empty().await);

    let after = app.get("/api/user/me", Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let app = test_app();

    let response = app.get("/auth/logout", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(CLIENT_URL));
    assert!(cookie_pair(&response, "clubee.sid").is_some());
}

#[tokio::test]
async fn login_listings_are_newest_first() {
    let app = test_app();
    app.sign_in("good").await;
    app.sign_in("other").await;

    let response = app.get("/api/logins", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let logs = body["logs"].as_array().expect("logs array");
    assert_eq!(logs.len(), 2);
    assert!(logs[0]["email"].is_null());
    assert_eq!(logs[1]["email"], "ana@example.com");

    let admin = json_body(app.get("/admin/logins", None).await).await;
    let entries = admin.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], logs[0]["id"]);
}

#[tokio::test]
async fn sliding_sessions_reissue_the_cookie_on_each_request() {
    let settings = AuthSettings {
        expiry_policy: ExpiryPolicy::Sliding,
        ..common::settings()
    };
    let app = common::test_app_with(settings, Arc::new(InMemoryLoginLogStore::new()));
    let cookie = app.sign_in("good").await;

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let response = app.get("/api/user/me", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = set_cookie(&response, "clubee.sid").expect("refreshed session cookie");
    assert!(refreshed.contains("Max-Age=604800"));
    assert!(refreshed.contains("HttpOnly"));

    let renewed = cookie_pair(&response, "clubee.sid").expect("cookie pair");
    let again = app.get("/api/user/me", Some(&renewed)).await;
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn sliding_sessions_do_not_reissue_without_a_session() {
    let settings = AuthSettings {
        expiry_policy: ExpiryPolicy::Sliding,
        ..common::settings()
    };
    let app = common::test_app_with(settings, Arc::new(InMemoryLoginLogStore::new()));

    let response = app.get("/api/user/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response, "clubee.sid").is_none());
}

#[tokio::test]
async fn fixed_sessions_keep_the_login_cookie() {
    let app = test_app();
    let cookie = app.sign_in("good").await;

    let response = app.get("/api/user/me", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "clubee.sid").is_none());
}

struct FailingLoginLog;

#[async_trait]
impl LoginLogStore for FailingLoginLog {
    async fn append(&self, _entry: &LoginLogEntry) -> Result<(), Report<StoreError>> {
        Err(Report::from(StoreError::write("login log", "disk full")))
    }

    async fn recent(&self) -> Result<Vec<LoginLogEntry>, Report<StoreError>> {
        Err(Report::from(StoreError::read("login log", "disk full")))
    }
}

#[tokio::test]
async fn audit_failure_does_not_block_login() {
    let app = common::test_app_with(common::settings(), Arc::new(FailingLoginLog));

    let cookie = app.sign_in("good").await;

    let me = app.get("/api/user/me", Some(&cookie)).await;
    assert_eq!(me.status(), StatusCode::OK);

    let logs = app.get("/api/logins", None).await;
    assert_eq!(logs.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(logs).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Erro ao buscar logs");
}

//! Shared harness for the HTTP tests: in-memory stores, a scripted identity
//! provider, and cookie plumbing.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use clubee_content::memory::{InMemoryProgressStore, InMemoryZunzunStore};
use clubee_platform_access::{
    AuthenticationError, ExternalProfile, IdentityProvider, LoginInitiation, LoginLogStore,
    memory::{InMemoryLoginLogStore, InMemorySessionStore, InMemoryUserStore},
};
use clubee_server::{
    app,
    auth::{AppState, AuthSettings},
    db::Storage,
};
use rootcause::Report;
use serde_json::Value;
use tower::ServiceExt;

pub const STATE: &str = "state-123";
pub const CLIENT_URL: &str = "http://localhost:5173";
pub const SECRET: &str = "test session secret";

/// Provider whose behavior is keyed by the authorization code.
///
/// - `good`: Ana, with email and photo
/// - `other`: Bia, without email
/// - `slow`: answers after five seconds
/// - anything else: provider error
pub struct FakeProvider;

pub fn ana() -> ExternalProfile {
    ExternalProfile::new("g-100".to_string(), "Ana Souza".to_string())
        .with_emails(vec!["ana@example.com".to_string()])
        .with_photos(vec!["https://lh3.example/ana.jpg".to_string()])
}

pub fn bia() -> ExternalProfile {
    ExternalProfile::new("g-200".to_string(), "Bia".to_string())
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn begin_authorization(&self) -> LoginInitiation {
        LoginInitiation {
            authorization_url: format!("https://accounts.example/auth?state={STATE}"),
            state: STATE.to_string(),
            pkce_verifier: "verifier-123".to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ExternalProfile, Report<AuthenticationError>> {
        assert_eq!(pkce_verifier, "verifier-123");
        match code {
            "good" => Ok(ana()),
            "other" => Ok(bia()),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ana())
            }
            _ => Err(Report::from(AuthenticationError::ProviderError {
                provider: "fake".to_string(),
                reason: "invalid_grant".to_string(),
            })),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserStore>,
    pub sessions: Arc<InMemorySessionStore>,
    pub login_log: Arc<dyn LoginLogStore>,
    pub progress: Arc<InMemoryProgressStore>,
}

pub fn settings() -> AuthSettings {
    AuthSettings {
        client_url: CLIENT_URL.to_string(),
        provider_timeout: Duration::from_millis(200),
        ..AuthSettings::default()
    }
}

pub fn test_app() -> TestApp {
    test_app_with(settings(), Arc::new(InMemoryLoginLogStore::new()))
}

pub fn test_app_with(settings: AuthSettings, login_log: Arc<dyn LoginLogStore>) -> TestApp {
    let users = Arc::new(InMemoryUserStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let progress = Arc::new(InMemoryProgressStore::new());
    let storage = Storage {
        users: users.clone(),
        sessions: sessions.clone(),
        login_log: login_log.clone(),
        zunzuns: Arc::new(InMemoryZunzunStore::new()),
        progress: progress.clone(),
    };
    let state = AppState::new(storage, Arc::new(FakeProvider), settings, SECRET);
    TestApp {
        router: app::router(state),
        users,
        sessions,
        login_log,
        progress,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body.to_string())).expect("request"))
            .await
    }

    /// Starts a login and returns the `auth_state` cookie pair.
    pub async fn begin_login(&self) -> String {
        let response = self.get("/auth/google", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie_pair(&response, "auth_state").expect("auth_state cookie")
    }

    /// Runs the callback with the given query and auth state cookie.
    pub async fn callback(&self, query: &str, auth_state: Option<&str>) -> Response<Body> {
        self.get(&format!("/auth/google/callback?{query}"), auth_state)
            .await
    }

    /// Completes a full login with `code` and returns the session cookie pair.
    pub async fn sign_in(&self, code: &str) -> String {
        let auth_state = self.begin_login().await;
        let response = self
            .callback(&format!("code={code}&state={STATE}"), Some(&auth_state))
            .await;
        assert_eq!(location(&response), Some(CLIENT_URL));
        cookie_pair(&response, "clubee.sid").expect("session cookie")
    }
}

/// Full `Set-Cookie` header for `name`, if the response sets it.
pub fn set_cookie<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
}

/// The `name=value` part of a `Set-Cookie` header, ready for a `Cookie` header.
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookie(response, name).and_then(|value| value.split(';').next().map(str::to_string))
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

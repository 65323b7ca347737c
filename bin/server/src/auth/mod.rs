//! Authentication for the Clubee server.
//!
//! This module provides:
//! - Google sign-in through the [`IdentityProvider`] seam
//! - Store-backed sessions bound to a signed `clubee.sid` cookie
//! - Authentication extractors for Axum routes
//!
//! The login audit runs inside the callback, after the session exists and
//! before the browser is sent back to the client app.

pub mod db;
pub mod google;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use clubee_content::{ProgressStore, ZunzunStore};
use clubee_platform_access::{
    ExpiryPolicy, IdentityProvider, JsonSessionCodec, LoginAudit, SessionId, SessionManager,
    UserStore,
};
use sha2::{Digest, Sha512};

use crate::config::ServerConfig;
use crate::db::Storage;

pub use google::GoogleOAuthClient;
pub use middleware::{AuthRejection, OptionalAuth, RequireAuth, renew_sliding_session};
pub use routes::{callback, login, login_failed, logout};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "clubee.sid";

/// Auth state cookie name (CSRF state and PKCE verifier during the handshake).
pub const AUTH_STATE_COOKIE: &str = "auth_state";

/// Cookie attributes that depend on the deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    /// Cross-site cookies over HTTPS: the client app lives on another origin.
    #[must_use]
    pub fn production() -> Self {
        Self {
            secure: true,
            same_site: SameSite::None,
        }
    }

    #[must_use]
    pub fn development() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// Settings the auth routes and extractors read on every request.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl: chrono::Duration,
    pub expiry_policy: ExpiryPolicy,
    pub cookies: CookiePolicy,
    /// Post-login and post-logout destination.
    pub client_url: String,
    /// Destination for failed logins.
    pub failure_redirect: String,
    /// Bound on the provider round trip in the callback.
    pub provider_timeout: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::days(7),
            expiry_policy: ExpiryPolicy::Fixed,
            cookies: CookiePolicy::development(),
            client_url: "http://localhost:5173".to_string(),
            failure_redirect: "/login/failed".to_string(),
            provider_timeout: Duration::from_secs(10),
        }
    }
}

impl AuthSettings {
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            session_ttl: config.session.ttl(),
            expiry_policy: config.session.expiry_policy(),
            cookies: if config.is_production() {
                CookiePolicy::production()
            } else {
                CookiePolicy::development()
            },
            client_url: config.client_url.clone(),
            failure_redirect: config.oauth.failure_redirect.clone(),
            provider_timeout: Duration::from_secs(config.oauth.timeout_seconds),
        }
    }
}

/// Derives the 64-byte cookie signing key from the session secret.
#[must_use]
pub fn derive_cookie_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// The signed session cookie, valid for one session TTL.
pub(crate) fn session_cookie(settings: &AuthSettings, id: &SessionId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(settings.cookies.secure)
        .same_site(settings.cookies.same_site)
        .max_age(time::Duration::seconds(settings.session_ttl.num_seconds()))
        .build()
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub users: Arc<dyn UserStore>,
    pub audit: LoginAudit,
    pub zunzuns: Arc<dyn ZunzunStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub provider: Arc<dyn IdentityProvider>,
    pub settings: Arc<AuthSettings>,
    cookie_key: Key,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        storage: Storage,
        provider: Arc<dyn IdentityProvider>,
        settings: AuthSettings,
        session_secret: &str,
    ) -> Self {
        let sessions = SessionManager::new(
            storage.sessions,
            storage.users.clone(),
            Arc::new(JsonSessionCodec),
            settings.session_ttl,
            settings.expiry_policy,
        );
        Self {
            sessions: Arc::new(sessions),
            users: storage.users,
            audit: LoginAudit::new(storage.login_log),
            zunzuns: storage.zunzuns,
            progress: storage.progress,
            provider,
            settings: Arc::new(settings),
            cookie_key: derive_cookie_key(session_secret),
        }
    }

    #[must_use]
    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

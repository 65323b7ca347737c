//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables. Top-level keys
//! keep their conventional names (`PORT`, `GOOGLE_CLIENT_ID`, ...); nested
//! settings use `__` as the separator, e.g. `SESSION__TTL_DAYS`.

use std::ops::RangeInclusive;

use chrono::Duration;
use clubee_platform_access::ExpiryPolicy;
use serde::Deserialize;

/// Accepted values for `SESSION__TTL_DAYS`.
pub const TTL_DAYS_RANGE: RangeInclusive<i64> = 1..=365;

/// Deployment environment, read from `NODE_ENV`.
///
/// Anything other than `production` is treated as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    #[serde(other)]
    Development,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, rename = "node_env")]
    pub environment: Environment,

    pub google_client_id: String,
    pub google_client_secret: String,

    /// Secret the cookie signing key is derived from.
    pub session_secret: String,

    /// PostgreSQL connection URL. Without it all state is kept in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Browser app origin: CORS origin and post-login redirect target.
    #[serde(default = "default_client_url")]
    pub client_url: String,

    /// Public base URL of this backend. Required in production.
    #[serde(default)]
    pub backend_url: Option<String>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub oauth: OAuthSettings,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,

    /// Push expiry forward on every authenticated request.
    #[serde(default)]
    pub sliding: bool,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

/// OAuth handshake settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    /// Upper bound on the provider round trip during the callback.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Where failed logins are sent.
    #[serde(default = "default_failure_redirect")]
    pub failure_redirect: String,
}

fn default_port() -> u16 {
    3001
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_ttl_days() -> i64 {
    7
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_failure_redirect() -> String {
    "/login/failed".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            sliding: false,
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl SessionConfig {
    /// Session lifetime, clamped to [`TTL_DAYS_RANGE`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        let days = self
            .ttl_days
            .clamp(*TTL_DAYS_RANGE.start(), *TTL_DAYS_RANGE.end());
        Duration::try_days(days).unwrap_or_else(|| Duration::days(default_ttl_days()))
    }

    #[must_use]
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        if self.sliding {
            ExpiryPolicy::Sliding
        } else {
            ExpiryPolicy::Fixed
        }
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            failure_redirect: default_failure_redirect(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Loads configuration from an arbitrary source and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_source<T>(source: T) -> Result<Self, config::ConfigError>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.session_secret.is_empty() {
            return Err(config::ConfigError::Message(
                "SESSION_SECRET must not be empty".to_string(),
            ));
        }
        if !TTL_DAYS_RANGE.contains(&self.session.ttl_days) {
            return Err(config::ConfigError::Message(format!(
                "SESSION__TTL_DAYS must be between {} and {}, got {}",
                TTL_DAYS_RANGE.start(),
                TTL_DAYS_RANGE.end(),
                self.session.ttl_days
            )));
        }
        if self.session.cleanup_interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "SESSION__CLEANUP_INTERVAL_SECONDS must be greater than zero".to_string(),
            ));
        }
        if self.is_production() && self.backend_url.is_none() {
            return Err(config::ConfigError::Message(
                "BACKEND_URL is required in production".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// The OAuth callback URL registered with Google.
    ///
    /// Production derives it from `BACKEND_URL` so it stays correct behind a
    /// reverse proxy.
    #[must_use]
    pub fn callback_url(&self) -> String {
        match (&self.environment, &self.backend_url) {
            (Environment::Production, Some(backend)) => {
                format!("{}/auth/google/callback", backend.trim_end_matches('/'))
            }
            _ => format!("http://localhost:{}/auth/google/callback", self.port),
        }
    }
}

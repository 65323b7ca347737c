//! Identity, session, and login audit for the Clubee backend.
//!
//! This crate provides:
//! - User management (`User`, find-or-create through `UserStore`)
//! - Session management (`Session`, `SessionId`, `SessionManager`)
//! - Principal encoding (`SessionCodec`, `JsonSessionCodec`)
//! - The OAuth provider seam (`IdentityProvider`, `OAuthConfig`)
//! - The login audit log (`LoginAudit`, `LoginLogEntry`)
//! - In-memory stores for development and tests
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Duration;
//! use clubee_platform_access::{
//!     ExpiryPolicy, ExternalProfile, JsonSessionCodec, SessionManager, UserStore,
//!     memory::{InMemorySessionStore, InMemoryUserStore},
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let users = Arc::new(InMemoryUserStore::new());
//! let sessions = SessionManager::new(
//!     Arc::new(InMemorySessionStore::new()),
//!     users.clone(),
//!     Arc::new(JsonSessionCodec),
//!     Duration::days(7),
//!     ExpiryPolicy::Fixed,
//! );
//!
//! let profile = ExternalProfile::new("10769150350006150715113082367".to_string(), "Ana".to_string());
//! let user = users.find_or_create(&profile).await.unwrap().user;
//! let session = sessions.create(&user).await.unwrap();
//!
//! let resolved = sessions.resolve(session.id()).await.unwrap().into_user().unwrap();
//! assert_eq!(resolved.user_id(), user.id());
//! # });
//! ```

pub mod auth;
pub mod codec;
pub mod error;
pub mod login_log;
pub mod manager;
pub mod memory;
pub mod oauth;
pub mod provider;
pub mod session;
pub mod store;
pub mod user;

// Re-export main types at crate root
pub use auth::{
    AuthResult, AuthenticatedUser, CallbackData, ExternalProfile, LoginInitiation, Registration,
};
pub use codec::{JsonSessionCodec, PrincipalRef, SessionCodec};
pub use error::{AuthenticationError, StoreError};
pub use login_log::{LoginAudit, LoginLogEntry};
pub use manager::{ExpiryPolicy, SessionManager};
pub use oauth::OAuthConfig;
pub use provider::IdentityProvider;
pub use session::{Session, SessionId};
pub use store::{LoginLogStore, SessionStore, UserStore};
pub use user::User;

//! Session lifecycle.
//!
//! The [`SessionManager`] issues sessions for authenticated users, resolves a
//! session id back into a user on each request, and destroys sessions on
//! logout. Resolution never fails for an unknown, expired, or dangling
//! session; those come back as non-authenticated [`AuthResult`] variants.
//! Only storage failures are errors.

use std::sync::Arc;

use chrono::Duration;
use rootcause::Report;
use tracing::instrument;

use crate::auth::{AuthResult, AuthenticatedUser};
use crate::codec::{PrincipalRef, SessionCodec};
use crate::error::StoreError;
use crate::session::{Session, SessionId};
use crate::store::{SessionStore, UserStore};
use crate::user::User;

/// How a session's expiry reacts to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Expires a fixed duration after issuance.
    #[default]
    Fixed,
    /// Each successful resolution pushes expiry to now + TTL.
    Sliding,
}

/// Issues, resolves, and destroys sessions.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    codec: Arc<dyn SessionCodec>,
    ttl: Duration,
    policy: ExpiryPolicy,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        codec: Arc<dyn SessionCodec>,
        ttl: Duration,
        policy: ExpiryPolicy,
    ) -> Self {
        Self {
            store,
            users,
            codec,
            ttl,
            policy,
        }
    }

    /// Session lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Issues a new session whose principal references `user`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the principal cannot be encoded or the
    /// session cannot be persisted.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn create(&self, user: &User) -> Result<Session, Report<StoreError>> {
        let principal = self.codec.encode(&PrincipalRef::new(user.id()))?;
        let session = Session::new(SessionId::generate(), principal, self.ttl);
        self.store.create(&session).await?;
        tracing::debug!(expires_at = %session.expires_at(), "session created");
        Ok(session)
    }

    /// Resolves a session id into the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` only when the session or user store fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self, id: &SessionId) -> Result<AuthResult, Report<StoreError>> {
        let Some(mut session) = self.store.find(id).await? else {
            return Ok(AuthResult::Unauthenticated);
        };

        if session.is_expired() {
            self.store.delete(id).await?;
            tracing::debug!("removed expired session");
            return Ok(AuthResult::SessionExpired {
                session_id: id.clone(),
            });
        }

        let Some(principal) = self.codec.decode(session.principal()) else {
            tracing::warn!("session principal could not be decoded");
            return Ok(AuthResult::PrincipalInvalid {
                session_id: id.clone(),
            });
        };

        let Some(user) = self.users.find_by_id(principal.user_id).await? else {
            tracing::warn!(user_id = %principal.user_id, "session refers to unknown user");
            return Ok(AuthResult::UserMissing {
                session_id: id.clone(),
                user_id: principal.user_id,
            });
        };

        if self.policy == ExpiryPolicy::Sliding {
            session.extend(self.ttl);
            self.store.touch(id, session.expires_at()).await?;
        }

        Ok(AuthResult::Authenticated(Box::new(AuthenticatedUser::new(
            session, user,
        ))))
    }

    /// Destroys a session. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the delete fails.
    #[instrument(skip(self))]
    pub async fn destroy(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        self.store.delete(id).await
    }

    /// Removes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the purge fails.
    pub async fn purge_expired(&self) -> Result<u64, Report<StoreError>> {
        self.store.delete_expired().await
    }
}

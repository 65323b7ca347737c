//! Storage seams for users, sessions, and the login log.
//!
//! Each trait has an in-memory implementation in [`crate::memory`]; the
//! server provides Postgres implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubee_core::UserId;
use rootcause::Report;

use crate::auth::{ExternalProfile, Registration};
use crate::error::StoreError;
use crate::login_log::LoginLogEntry;
use crate::session::{Session, SessionId};
use crate::user::User;

/// Durable record of known users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by internal id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Report<StoreError>>;

    /// Finds a user by provider subject id.
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, Report<StoreError>>;

    /// Returns the user for `profile.subject`, creating it if absent.
    ///
    /// Must be atomic with respect to the subject: concurrent calls for the
    /// same subject yield one stored user. Existing users are returned as-is.
    async fn find_or_create(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Registration, Report<StoreError>>;
}

/// Persistence for session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), Report<StoreError>>;

    /// Loads a session regardless of expiry; callers check validity.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>>;

    /// Moves a session's expiry.
    async fn touch(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Report<StoreError>>;

    /// Deletes a session. Deleting an unknown id is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>>;

    /// Deletes every expired session and returns how many were removed.
    async fn delete_expired(&self) -> Result<u64, Report<StoreError>>;
}

/// Append-only log of successful logins.
#[async_trait]
pub trait LoginLogStore: Send + Sync {
    async fn append(&self, entry: &LoginLogEntry) -> Result<(), Report<StoreError>>;

    /// Lists entries, newest first.
    async fn recent(&self) -> Result<Vec<LoginLogEntry>, Report<StoreError>>;
}

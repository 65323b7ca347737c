//! In-memory store implementations.
//!
//! State lives only as long as the process. Used when no database is
//! configured and throughout the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubee_core::UserId;
use rootcause::Report;
use tokio::sync::RwLock;

use crate::auth::{ExternalProfile, Registration};
use crate::error::StoreError;
use crate::login_log::LoginLogEntry;
use crate::session::{Session, SessionId};
use crate::store::{LoginLogStore, SessionStore, UserStore};
use crate::user::User;

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    id_by_subject: HashMap<String, UserId>,
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes a user. Only tests and tooling need this; the login flow never
    /// deletes users.
    pub async fn remove(&self, id: UserId) -> Option<User> {
        let mut table = self.table.write().await;
        let user = table.by_id.remove(&id)?;
        table.id_by_subject.remove(user.subject());
        Some(user)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Report<StoreError>> {
        Ok(self.table.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, Report<StoreError>> {
        let table = self.table.read().await;
        Ok(table
            .id_by_subject
            .get(subject)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_or_create(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Registration, Report<StoreError>> {
        // One write lock covers both the lookup and the insert.
        let mut table = self.table.write().await;
        if let Some(existing) = table
            .id_by_subject
            .get(&profile.subject)
            .and_then(|id| table.by_id.get(id))
        {
            return Ok(Registration {
                user: existing.clone(),
                is_new_user: false,
            });
        }

        let user = User::from_profile(profile);
        table
            .id_by_subject
            .insert(user.subject().to_string(), user.id());
        table.by_id.insert(user.id(), user.clone());
        Ok(Registration {
            user,
            is_new_user: true,
        })
    }
}

/// In-memory [`SessionStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), Report<StoreError>> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(StoreError::write("session", "session id already exists").into());
        }
        sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn touch(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Report<StoreError>> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(id) {
            session.set_expires_at(expires_at);
        }
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<StoreError>> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.is_valid());
        Ok((before - sessions.len()) as u64)
    }
}

/// In-memory [`LoginLogStore`].
#[derive(Debug, Default)]
pub struct InMemoryLoginLogStore {
    entries: RwLock<Vec<LoginLogEntry>>,
}

impl InMemoryLoginLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginLogStore for InMemoryLoginLogStore {
    async fn append(&self, entry: &LoginLogEntry) -> Result<(), Report<StoreError>> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<LoginLogEntry>, Report<StoreError>> {
        let mut entries = self.entries.read().await.clone();
        // Reversed first so ties keep the latest append on top.
        entries.reverse();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    fn profile(subject: &str) -> ExternalProfile {
        ExternalProfile::new(subject.to_string(), format!("User {subject}"))
            .with_emails(vec![format!("{subject}@example.com")])
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let store = InMemoryUserStore::new();

        let first = store.find_or_create(&profile("g-1")).await.expect("first");
        let second = store.find_or_create(&profile("g-1")).await.expect("second");

        assert!(first.is_new_user);
        assert!(!second.is_new_user);
        assert_eq!(first.user.id(), second.user.id());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_or_create_does_not_refresh_existing_fields() {
        let store = InMemoryUserStore::new();
        store.find_or_create(&profile("g-1")).await.expect("create");

        let renamed = ExternalProfile::new("g-1".to_string(), "New Name".to_string());
        let again = store.find_or_create(&renamed).await.expect("again");

        assert_eq!(again.user.display_name(), "User g-1");
        assert_eq!(again.user.email(), Some("g-1@example.com"));
    }

    #[tokio::test]
    async fn concurrent_first_logins_create_one_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.find_or_create(&profile("race")).await.expect("create")
            }));
        }

        let mut ids = Vec::new();
        let mut created = 0;
        for handle in handles {
            let registration = handle.await.expect("join");
            if registration.is_new_user {
                created += 1;
            }
            ids.push(registration.user.id());
        }

        assert_eq!(created, 1);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn lookups_by_id_and_subject() {
        let store = InMemoryUserStore::new();
        let user = store.find_or_create(&profile("g-2")).await.expect("create").user;

        let by_id = store.find_by_id(user.id()).await.expect("by id");
        let by_subject = store.find_by_subject("g-2").await.expect("by subject");
        assert_eq!(by_id.as_ref(), Some(&user));
        assert_eq!(by_subject.as_ref(), Some(&user));
        assert!(store.find_by_subject("nobody").await.expect("miss").is_none());

        store.remove(user.id()).await;
        assert!(store.find_by_id(user.id()).await.expect("gone").is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn session_store_rejects_duplicate_ids() {
        let store = InMemorySessionStore::new();
        let session = Session::new(SessionId::generate(), Vec::new(), Duration::days(7));

        store.create(&session).await.expect("create");
        assert!(store.create(&session).await.is_err());
    }

    #[tokio::test]
    async fn session_store_touch_and_delete() {
        let store = InMemorySessionStore::new();
        let session = Session::new(SessionId::generate(), b"x".to_vec(), Duration::minutes(1));
        store.create(&session).await.expect("create");

        let later = Utc::now() + Duration::days(3);
        store.touch(session.id(), later).await.expect("touch");
        let found = store.find(session.id()).await.expect("find").expect("present");
        assert_eq!(found.expires_at(), later);
        assert_eq!(found.principal(), b"x");

        store.delete(session.id()).await.expect("delete");
        assert!(store.find(session.id()).await.expect("find").is_none());
        store.delete(session.id()).await.expect("second delete is fine");
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_sessions() {
        let store = InMemorySessionStore::new();
        let live = Session::new(SessionId::generate(), Vec::new(), Duration::days(7));
        let dead = Session::new(SessionId::generate(), Vec::new(), Duration::seconds(-5));
        store.create(&live).await.expect("live");
        store.create(&dead).await.expect("dead");

        assert_eq!(store.delete_expired().await.expect("purge"), 1);
        assert_eq!(store.len().await, 1);
        assert!(store.find(live.id()).await.expect("find").is_some());
    }
}

//! Server-side session records.
//!
//! A session binds an opaque id (the browser cookie value) to an encoded
//! principal. Sessions are created after a successful OAuth callback and are
//! destroyed on logout or once they expire.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a session.
///
/// Session IDs are opaque strings generated during session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh, unique session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("sess_{}", ulid::Ulid::new()))
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An issued session.
///
/// The principal is stored in encoded form; only the
/// [`SessionCodec`](crate::codec::SessionCodec) knows its layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    principal: Vec<u8>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session valid for `ttl` from now.
    #[must_use]
    pub fn new(id: SessionId, principal: Vec<u8>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            principal,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Reconstitutes a session from storage.
    #[must_use]
    pub fn with_all_fields(
        id: SessionId,
        principal: Vec<u8>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            principal,
            created_at,
            expires_at,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the encoded principal.
    #[must_use]
    pub fn principal(&self) -> &[u8] {
        &self.principal
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session is still valid (not expired).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }

    /// Pushes the expiry to `ttl` from now.
    pub fn extend(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }

    pub fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = expires_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session_id() -> SessionId {
        SessionId::new("sess_test_123".to_string())
    }

    #[test]
    fn session_id_display() {
        assert_eq!(test_session_id().to_string(), "sess_test_123");
    }

    #[test]
    fn generated_session_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("sess_"));
    }

    #[test]
    fn new_session_expires_after_ttl() {
        let before = Utc::now();
        let session = Session::new(test_session_id(), b"p".to_vec(), Duration::days(7));
        let after = Utc::now();

        assert!(session.created_at() >= before);
        assert!(session.created_at() <= after);
        assert_eq!(session.expires_at() - session.created_at(), Duration::days(7));
        assert_eq!(session.principal(), b"p");
        assert!(session.is_valid());
    }

    #[test]
    fn session_with_negative_ttl_is_expired() {
        let session = Session::new(test_session_id(), Vec::new(), Duration::seconds(-1));
        assert!(session.is_expired());
        assert!(!session.is_valid());
    }

    #[test]
    fn extend_moves_expiry_forward() {
        let mut session = Session::new(test_session_id(), Vec::new(), Duration::seconds(1));
        let old_expires = session.expires_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        session.extend(Duration::hours(2));

        assert!(session.expires_at() > old_expires);
        assert!(session.is_valid());
    }
}

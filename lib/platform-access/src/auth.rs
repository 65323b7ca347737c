//! Authentication flow types.
//!
//! These types carry data between the OAuth exchange, the identity store,
//! and the session manager:
//! - `ExternalProfile`: what the provider tells us about the user
//! - `LoginInitiation` / `CallbackData`: the two legs of the handshake
//! - `Registration`: the outcome of find-or-create
//! - `AuthenticatedUser` / `AuthResult`: the outcome of session resolution

use clubee_core::UserId;
use serde::Deserialize;

use crate::error::AuthenticationError;
use crate::session::{Session, SessionId};
use crate::user::User;

/// Represents an authenticated user context resolved from a session.
///
/// Handlers behind the access guard receive this value.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    session: Session,
    user: User,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user context.
    #[must_use]
    pub fn new(session: Session, user: User) -> Self {
        Self { session, user }
    }

    /// Returns the authenticated user's ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    /// Returns the current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the user record.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}

/// Profile returned by the identity provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// The provider's stable subject id for this person.
    pub subject: String,
    /// Display name.
    pub display_name: String,
    /// Email addresses, primary first. May be empty.
    pub emails: Vec<String>,
    /// Photo URLs, primary first. May be empty.
    pub photos: Vec<String>,
}

impl ExternalProfile {
    /// Creates a profile with no emails or photos.
    #[must_use]
    pub fn new(subject: String, display_name: String) -> Self {
        Self {
            subject,
            display_name,
            emails: Vec::new(),
            photos: Vec::new(),
        }
    }

    /// Sets the email list.
    #[must_use]
    pub fn with_emails(mut self, emails: Vec<String>) -> Self {
        self.emails = emails;
        self
    }

    /// Sets the photo list.
    #[must_use]
    pub fn with_photos(mut self, photos: Vec<String>) -> Self {
        self.photos = photos;
        self
    }

    /// Returns the first email, if any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }

    /// Returns the first photo, if any.
    #[must_use]
    pub fn primary_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

/// Login initiation data for redirecting to the provider.
#[derive(Debug, Clone)]
pub struct LoginInitiation {
    /// The URL to redirect the user to for authentication.
    pub authorization_url: String,
    /// State parameter for CSRF protection (store in a cookie).
    pub state: String,
    /// PKCE code verifier (store securely for the callback).
    pub pkce_verifier: String,
}

/// Data the provider sends back on the callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackData {
    /// The authorization code, present on success.
    pub code: Option<String>,
    /// The state parameter (must match the one from login initiation).
    pub state: Option<String>,
    /// Error code reported by the provider, e.g. `access_denied`.
    pub error: Option<String>,
}

impl CallbackData {
    /// Checks the callback against the state issued at login and returns the
    /// authorization code.
    ///
    /// # Errors
    ///
    /// A provider-reported error wins over everything else. Otherwise the
    /// state must match `expected_state` and a non-empty code must be present.
    pub fn verify(&self, expected_state: &str) -> Result<&str, AuthenticationError> {
        if let Some(reason) = &self.error {
            return Err(AuthenticationError::ProviderDenied {
                reason: reason.clone(),
            });
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(AuthenticationError::StateMismatch);
        }
        self.code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or(AuthenticationError::MissingCode)
    }
}

/// Outcome of find-or-create in the identity store.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The stored user.
    pub user: User,
    /// Whether this call created the record.
    pub is_new_user: bool,
}

/// Result of resolving a session id.
#[derive(Debug)]
pub enum AuthResult {
    /// The session is live and its principal resolved to a user.
    Authenticated(Box<AuthenticatedUser>),
    /// No session is stored under this id.
    Unauthenticated,
    /// The session existed but had expired; it has been removed.
    SessionExpired { session_id: SessionId },
    /// The stored principal could not be decoded.
    PrincipalInvalid { session_id: SessionId },
    /// The principal refers to a user that no longer exists.
    UserMissing { session_id: SessionId, user_id: UserId },
}

impl AuthResult {
    /// Returns the authenticated user, discarding the failure reason.
    #[must_use]
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        match self {
            Self::Authenticated(user) => Some(*user),
            _ => None,
        }
    }

    /// Returns true if resolution produced a user.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

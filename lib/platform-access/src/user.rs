//! User domain type.
//!
//! A User is a person known to the platform. Users are identified by the
//! subject id the OAuth provider issues and have a corresponding internal
//! `UserId`.

use chrono::{DateTime, Utc};
use clubee_core::UserId;
use serde::{Deserialize, Serialize};

use crate::auth::ExternalProfile;

/// A registered platform user.
///
/// Created on the first successful OAuth exchange for a subject id. Repeat
/// logins return the stored record without refreshing its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    /// Provider subject id (Google `sub`). Unique across users.
    subject: String,
    /// Display name reported by the provider.
    display_name: String,
    /// Primary email address, if the provider shared one.
    email: Option<String>,
    /// Profile photo URL, if the provider shared one.
    photo: Option<String>,
    /// When the user record was created.
    created_at: DateTime<Utc>,
    /// When the user record was last updated.
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated id.
    #[must_use]
    pub fn new(subject: String, display_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            subject,
            display_name,
            email: None,
            photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a user from a provider profile.
    ///
    /// The first email and first photo are kept; absent entries stay absent.
    #[must_use]
    pub fn from_profile(profile: &ExternalProfile) -> Self {
        let mut user = Self::new(profile.subject.clone(), profile.display_name.clone());
        user.email = profile.primary_email().map(str::to_string);
        user.photo = profile.primary_photo().map(str::to_string);
        user
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from storage.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        subject: String,
        display_name: String,
        email: Option<String>,
        photo: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject,
            display_name,
            email,
            photo,
            created_at,
            updated_at,
        }
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the provider subject id.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the user's email address, if available.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the user's photo URL, if available.
    #[must_use]
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

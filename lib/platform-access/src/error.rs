//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AuthenticationError`: OAuth handshake failures
//! - `StoreError`: Persistence failures behind the store traits

use std::fmt;

/// Errors from the OAuth exchange with the identity provider.
///
/// Every variant ends the login attempt; the web layer turns them into a
/// redirect to the failure destination rather than an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The user declined consent or the provider reported an error on the callback.
    ProviderDenied { reason: String },
    /// The provider could not be reached or returned an unusable response.
    ProviderError { provider: String, reason: String },
    /// The provider did not answer within the configured bound.
    Timeout { seconds: u64 },
    /// The auth state cookie was absent or unreadable.
    MissingAuthState,
    /// The `state` parameter did not match the one issued at login.
    StateMismatch,
    /// The callback did not carry an authorization code.
    MissingCode,
    /// The provider profile lacks a required field.
    MissingClaim { claim: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderDenied { reason } => {
                write!(f, "provider denied authorization: {reason}")
            }
            Self::ProviderError { provider, reason } => {
                write!(f, "OAuth provider '{provider}' error: {reason}")
            }
            Self::Timeout { seconds } => {
                write!(f, "provider did not respond within {seconds}s")
            }
            Self::MissingAuthState => write!(f, "missing auth state"),
            Self::StateMismatch => write!(f, "state parameter mismatch"),
            Self::MissingCode => write!(f, "missing authorization code"),
            Self::MissingClaim { claim } => {
                write!(f, "missing required claim: {claim}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from user, session, and login log stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading from the backing store failed.
    ReadFailed { entity: &'static str, reason: String },
    /// Writing to the backing store failed.
    WriteFailed { entity: &'static str, reason: String },
    /// A stored value could not be encoded or decoded.
    Serialization { reason: String },
}

impl StoreError {
    /// Builds a read failure for the given entity.
    pub fn read(entity: &'static str, reason: impl fmt::Display) -> Self {
        Self::ReadFailed {
            entity,
            reason: reason.to_string(),
        }
    }

    /// Builds a write failure for the given entity.
    pub fn write(entity: &'static str, reason: impl fmt::Display) -> Self {
        Self::WriteFailed {
            entity,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { entity, reason } => {
                write!(f, "failed to read {entity}: {reason}")
            }
            Self::WriteFailed { entity, reason } => {
                write!(f, "failed to write {entity}: {reason}")
            }
            Self::Serialization { reason } => {
                write!(f, "serialization failed: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

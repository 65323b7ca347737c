//! Principal encoding for session records.
//!
//! Sessions never hold the user record itself. They hold a [`PrincipalRef`]
//! encoded by a [`SessionCodec`], which the session manager re-expands into a
//! full user on every request.

use clubee_core::UserId;
use rootcause::Report;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Minimal stable reference to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRef {
    pub user_id: UserId,
}

impl PrincipalRef {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Encodes principals into session payloads and back.
pub trait SessionCodec: Send + Sync {
    /// Encodes the principal for storage in a session record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the principal cannot be encoded.
    fn encode(&self, principal: &PrincipalRef) -> Result<Vec<u8>, Report<StoreError>>;

    /// Decodes a stored payload. Returns `None` for anything unreadable.
    fn decode(&self, bytes: &[u8]) -> Option<PrincipalRef>;
}

/// JSON codec producing `{"user_id":"<ulid>"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSessionCodec;

impl SessionCodec for JsonSessionCodec {
    fn encode(&self, principal: &PrincipalRef) -> Result<Vec<u8>, Report<StoreError>> {
        serde_json::to_vec(principal).map_err(|e| {
            StoreError::Serialization {
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn decode(&self, bytes: &[u8]) -> Option<PrincipalRef> {
        match serde_json::from_slice(bytes) {
            Ok(principal) => Some(principal),
            Err(e) => {
                tracing::debug!(error = %e, "discarding undecodable session principal");
                None
            }
        }
    }
}

//! The identity provider seam.

use async_trait::async_trait;
use rootcause::Report;

use crate::auth::{ExternalProfile, LoginInitiation};
use crate::error::AuthenticationError;

/// An OAuth identity provider that can run the authorization-code handshake.
///
/// The server ships a Google implementation; tests substitute a fake.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Builds the authorization URL along with the CSRF state and PKCE
    /// verifier the callback will need.
    fn begin_authorization(&self) -> LoginInitiation;

    /// Exchanges an authorization code for the user's profile.
    ///
    /// # Errors
    ///
    /// Returns an `AuthenticationError` when the provider rejects the code,
    /// is unreachable, or returns a profile without a subject.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ExternalProfile, Report<AuthenticationError>>;
}

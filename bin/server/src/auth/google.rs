//! Google sign-in.
//!
//! Implements [`IdentityProvider`] with the authorization-code flow plus
//! PKCE, then reads the user's profile from Google's userinfo endpoint.

use async_trait::async_trait;
use clubee_platform_access::{
    AuthenticationError, ExternalProfile, IdentityProvider, LoginInitiation, OAuthConfig,
};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl, basic::BasicClient,
};
use rootcause::Report;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "google";

/// Profile fields returned by the userinfo endpoint.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_profile(self) -> Result<ExternalProfile, AuthenticationError> {
        let display_name = self
            .name
            .filter(|name| !name.is_empty())
            .or_else(|| self.email.clone())
            .ok_or_else(|| AuthenticationError::MissingClaim {
                claim: "name".to_string(),
            })?;
        Ok(ExternalProfile::new(self.sub, display_name)
            .with_emails(self.email.into_iter().collect())
            .with_photos(self.picture.into_iter().collect()))
    }
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
    userinfo_url: String,
    scopes: Vec<String>,
    http: reqwest::Client,
}

impl GoogleOAuthClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(
        config: &OAuthConfig,
        timeout: Duration,
    ) -> Result<Self, Report<AuthenticationError>> {
        let invalid = |what: &str, e: &dyn std::fmt::Display| AuthenticationError::ProviderError {
            provider: PROVIDER.to_string(),
            reason: format!("invalid {what}: {e}"),
        };

        let auth_url = AuthUrl::new(config.auth_url().to_string())
            .map_err(|e| invalid("authorization URL", &e))?;
        let token_url = TokenUrl::new(config.token_url().to_string())
            .map_err(|e| invalid("token URL", &e))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri().to_string())
            .map_err(|e| invalid("redirect URL", &e))?;

        // Token endpoints must not redirect (SSRF).
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| invalid("HTTP client", &e))?;

        Ok(Self {
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            auth_url,
            token_url,
            redirect_url,
            userinfo_url: config.userinfo_url().to_string(),
            scopes: config.scopes().into_iter().map(str::to_string).collect(),
            http,
        })
    }

    fn provider_error(reason: impl Into<String>) -> AuthenticationError {
        AuthenticationError::ProviderError {
            provider: PROVIDER.to_string(),
            reason: reason.into(),
        }
    }

    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<ExternalProfile, Report<AuthenticationError>> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("userinfo request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Google userinfo request failed");
            return Err(Self::provider_error(format!("userinfo returned {status}")).into());
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("unreadable userinfo: {e}")))?;

        Ok(info.into_profile()?)
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn begin_authorization(&self) -> LoginInitiation {
        let client = BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_redirect_uri(self.redirect_url.clone());

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);
        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (url, csrf_token) = request.url();

        LoginInitiation {
            authorization_url: url.to_string(),
            state: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ExternalProfile, Report<AuthenticationError>> {
        let client = BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone());

        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| Self::provider_error(format!("token exchange failed: {e}")))?;

        self.fetch_profile(token.access_token().secret()).await
    }
}

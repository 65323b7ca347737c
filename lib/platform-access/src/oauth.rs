//! OAuth 2.0 provider configuration.
//!
//! Describes how to reach the external identity provider. The defaults point
//! at Google's authorization, token, and userinfo endpoints.

/// Google OAuth authorization URL.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token URL.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google userinfo endpoint.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Configuration for the OAuth identity provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the callback (e.g. "https://api.example.com/auth/google/callback").
    redirect_uri: String,
    scopes: Vec<String>,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl OAuthConfig {
    /// Creates a Google configuration with default scopes and endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes: vec!["profile".to_string(), "email".to_string()],
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the scopes to request.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    #[must_use]
    pub fn userinfo_url(&self) -> &str {
        &self.userinfo_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig::new(
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://localhost:3001/auth/google/callback".to_string(),
        )
    }

    #[test]
    fn new_config_targets_google_with_profile_and_email() {
        let config = config();

        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:3001/auth/google/callback"
        );
        assert_eq!(config.scopes(), vec!["profile", "email"]);
        assert_eq!(config.auth_url(), GOOGLE_AUTH_URL);
        assert_eq!(config.token_url(), GOOGLE_TOKEN_URL);
        assert_eq!(config.userinfo_url(), GOOGLE_USERINFO_URL);
    }
}

//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, SameSite},
};
use clubee_platform_access::{AuthenticationError, CallbackData, Session, SessionId};
use rootcause::Report;
use serde::{Deserialize, Serialize};
use time::Duration as TimeDuration;

use super::{AUTH_STATE_COOKIE, AppState, SESSION_COOKIE, session_cookie};
use crate::error::ApiError;

/// Serializable auth state for cookie storage.
#[derive(Debug, Serialize, Deserialize)]
struct AuthStateData {
    csrf_token: String,
    pkce_verifier: String,
}

/// Why a callback did not produce a session.
enum CallbackFailure {
    Auth(Report<AuthenticationError>),
    Api(ApiError),
}

impl From<AuthenticationError> for CallbackFailure {
    fn from(err: AuthenticationError) -> Self {
        Self::Auth(Report::from(err))
    }
}

/// Initiates the OAuth login flow by redirecting to Google.
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let initiation = state.provider.begin_authorization();

    let auth_state = AuthStateData {
        csrf_token: initiation.state,
        pkce_verifier: initiation.pkce_verifier,
    };
    let auth_state_json = match serde_json::to_string(&auth_state) {
        Ok(json) => json,
        Err(e) => return ApiError::storage("Erro ao iniciar login", e).into_response(),
    };

    // Lax so the cookie survives the top-level redirect back from Google.
    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state_json))
        .path("/")
        .http_only(true)
        .secure(state.settings.cookies.secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    tracing::debug!(provider = state.provider.name(), "redirecting to identity provider");
    (jar.add(cookie), Redirect::to(&initiation.authorization_url)).into_response()
}

/// Handles the OAuth callback.
///
/// Success ends at the client app with a session cookie; any handshake
/// failure ends at the failure destination without creating anything.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackData>,
    jar: SignedCookieJar,
) -> Response {
    let auth_state = jar
        .get(AUTH_STATE_COOKIE)
        .and_then(|cookie| serde_json::from_str::<AuthStateData>(cookie.value()).ok());
    let jar = jar.remove(Cookie::build(AUTH_STATE_COOKIE).path("/"));

    match complete_login(&state, &params, auth_state).await {
        Ok(session) => {
            let cookie = session_cookie(&state.settings, session.id());
            (jar.add(cookie), Redirect::to(&state.settings.client_url)).into_response()
        }
        Err(CallbackFailure::Auth(e)) => {
            tracing::warn!(error = %e, "login failed");
            let failure = ApiError::AuthFailure {
                redirect_to: state.settings.failure_redirect.clone(),
            };
            (jar, failure).into_response()
        }
        Err(CallbackFailure::Api(e)) => (jar, e).into_response(),
    }
}

async fn complete_login(
    state: &AppState,
    params: &CallbackData,
    auth_state: Option<AuthStateData>,
) -> Result<Session, CallbackFailure> {
    let auth_state = auth_state.ok_or(AuthenticationError::MissingAuthState)?;
    let code = params.verify(&auth_state.csrf_token)?;

    let timeout = state.settings.provider_timeout;
    let profile = match tokio::time::timeout(
        timeout,
        state.provider.exchange_code(code, &auth_state.pkce_verifier),
    )
    .await
    {
        Ok(Ok(profile)) => profile,
        Ok(Err(report)) => return Err(CallbackFailure::Auth(report)),
        Err(_) => {
            return Err(AuthenticationError::Timeout {
                seconds: timeout.as_secs(),
            }
            .into());
        }
    };

    let registration = state
        .users
        .find_or_create(&profile)
        .await
        .map_err(|e| CallbackFailure::Api(e.into()))?;
    let user = registration.user;
    if registration.is_new_user {
        tracing::info!(user_id = %user.id(), "new user registered");
    } else {
        tracing::info!(user_id = %user.id(), "returning user signed in");
    }

    let session = state
        .sessions
        .create(&user)
        .await
        .map_err(|e| CallbackFailure::Api(e.into()))?;

    state.audit.record(user.id(), user.email()).await;

    Ok(session)
}

/// Logs out the user by deleting their session.
///
/// Always clears the cookie and redirects, even without a live session.
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::new(cookie.value().to_string());
        if let Err(e) = state.sessions.destroy(&session_id).await {
            tracing::warn!(error = %e, "failed to delete session on logout");
        }
    }

    let policy = state.settings.cookies;
    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .max_age(TimeDuration::ZERO);

    (jar.add(removal), Redirect::to(&state.settings.client_url)).into_response()
}

/// Default failure destination.
pub async fn login_failed() -> ApiError {
    ApiError::Unauthenticated {
        message: "Falha na autenticação com o Google",
    }
}

//! Authentication extractors for Axum.

use std::sync::{Arc, OnceLock};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use clubee_platform_access::{
    AuthResult, AuthenticatedUser, ExpiryPolicy, SessionId, StoreError,
};
use rootcause::Report;

use super::{AppState, SESSION_COOKIE, session_cookie};
use crate::error::{ApiError, NOT_AUTHORIZED};

/// Resolves the request's session cookie into a user.
///
/// Cookies whose signature does not verify are treated as absent.
async fn resolve(parts: &Parts, state: &AppState) -> Result<AuthResult, Report<StoreError>> {
    let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key().clone());
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(AuthResult::Unauthenticated);
    };
    state
        .sessions
        .resolve(&SessionId::new(cookie.value().to_string()))
        .await
}

/// Slot the auth extractors fill when they resolve a live session.
#[derive(Clone, Default)]
struct SessionRenewal(Arc<OnceLock<SessionId>>);

impl SessionRenewal {
    fn mark(&self, id: &SessionId) {
        let _ = self.0.set(id.clone());
    }

    fn resolved(&self) -> Option<&SessionId> {
        self.0.get()
    }
}

/// Re-issues the session cookie after any request that resolved a session,
/// so the browser's copy slides along with the stored expiry.
///
/// A no-op under [`ExpiryPolicy::Fixed`].
pub async fn renew_sliding_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if state.settings.expiry_policy != ExpiryPolicy::Sliding {
        return next.run(request).await;
    }

    let renewal = SessionRenewal::default();
    request.extensions_mut().insert(renewal.clone());
    let response = next.run(request).await;

    match renewal.resolved() {
        Some(id) => (jar.add(session_cookie(&state.settings, id)), response).into_response(),
        None => response,
    }
}

/// Extractor for requiring an authenticated user.
///
/// Rejects with 401 JSON; never redirects.
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        match resolve(parts, &app_state).await {
            Ok(AuthResult::Authenticated(user)) => {
                if let Some(renewal) = parts.extensions.get::<SessionRenewal>() {
                    renewal.mark(user.session().id());
                }
                Ok(RequireAuth(*user))
            }
            Ok(other) => {
                tracing::debug!(outcome = ?other, "request rejected by access guard");
                Err(AuthRejection::NotAuthenticated)
            }
            Err(e) => Err(AuthRejection::Storage(e)),
        }
    }
}

/// Extractor for optionally getting the authenticated user.
///
/// Returns None if the user is not authenticated.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RequireAuth::from_request_parts(parts, state).await {
            Ok(RequireAuth(user)) => Ok(OptionalAuth(Some(user))),
            Err(AuthRejection::NotAuthenticated) => Ok(OptionalAuth(None)),
            Err(e) => Err(e),
        }
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
    Storage(Report<StoreError>),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => ApiError::Unauthenticated {
                message: NOT_AUTHORIZED,
            }
            .into_response(),
            Self::Storage(e) => ApiError::from(e).into_response(),
        }
    }
}

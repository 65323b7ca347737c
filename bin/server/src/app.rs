//! HTTP router.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::auth::{self, AppState};

/// Body of `GET /`.
pub const ROOT_MESSAGE: &str = "Clubee Backend is running.";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.client_url);

    Router::new()
        .route("/", get(|| async { ROOT_MESSAGE }))
        // Auth routes
        .route("/auth/google", get(auth::login))
        .route("/auth/google/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        .route("/login/failed", get(auth::login_failed))
        // API routes
        .route("/api/user/me", get(api::me))
        .route("/api/logins", get(api::list_logins))
        .route("/admin/logins", get(api::admin_logins))
        .route(
            "/api/zunzuns",
            get(api::list_zunzuns).post(api::create_zunzun),
        )
        .route(
            "/api/progress",
            get(api::list_progress).post(api::save_progress),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::renew_sliding_session,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allows the client app's origin with credentials.
fn cors_layer(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(client_url, error = %e, "invalid CLIENT_URL; CORS disabled");
            layer
        }
    }
}

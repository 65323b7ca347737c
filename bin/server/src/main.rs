use std::sync::Arc;
use std::time::Duration;

use clubee_platform_access::{OAuthConfig, SessionManager};
use clubee_server::{
    app,
    auth::{AppState, AuthSettings, GoogleOAuthClient},
    config::ServerConfig,
    db::Storage,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(
        production = config.is_production(),
        port = config.port,
        "Loaded configuration"
    );

    let storage = match &config.database_url {
        Some(database_url) => {
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .expect("failed to connect to database");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&db_pool)
                .await
                .expect("failed to run migrations");

            Storage::postgres(db_pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage");
            Storage::in_memory()
        }
    };

    let settings = AuthSettings::from_config(&config);
    let oauth_config = OAuthConfig::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.callback_url(),
    );
    let google = GoogleOAuthClient::new(&oauth_config, settings.provider_timeout)
        .expect("failed to initialize Google OAuth client");
    tracing::info!(callback_url = %oauth_config.redirect_uri(), "Google OAuth configured");

    let state = AppState::new(
        storage,
        Arc::new(google),
        settings,
        &config.session_secret,
    );

    // Cleanup expired sessions on startup, then periodically
    purge_expired_sessions(&state.sessions, "startup").await;
    let sessions = state.sessions.clone();
    let cleanup_interval = Duration::from_secs(config.session.cleanup_interval_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        // The first tick fires immediately; startup already purged.
        interval.tick().await;
        loop {
            interval.tick().await;
            purge_expired_sessions(&sessions, "periodic").await;
        }
    });

    let app = app::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn purge_expired_sessions(sessions: &SessionManager, trigger: &'static str) {
    match sessions.purge_expired().await {
        Ok(count) if count > 0 => {
            tracing::info!(deleted_sessions = count, trigger, "Cleaned up expired sessions");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, trigger, "Failed to cleanup expired sessions");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

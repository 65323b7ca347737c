//! Login audit listings.
//!
//! Both listings are unauthenticated, matching the existing client.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::types::LoginLogInfo;

async fn recent(state: &AppState) -> Result<Vec<LoginLogInfo>, ApiError> {
    let entries = state
        .audit
        .recent()
        .await
        .map_err(|e| ApiError::storage("Erro ao buscar logs", e))?;
    Ok(entries.into_iter().map(LoginLogInfo::from).collect())
}

/// `GET /api/logins`
pub async fn list_logins(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let logs = recent(&state).await?;
    Ok(Json(json!({ "success": true, "logs": logs })))
}

/// `GET /admin/logins`
pub async fn admin_logins(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoginLogInfo>>, ApiError> {
    Ok(Json(recent(&state).await?))
}

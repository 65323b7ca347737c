//! Trail progress.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use clubee_content::ProgressUpdate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::types::{ProgressInfo, ProgressRequest};

#[derive(Debug, Deserialize)]
pub struct TrailQuery {
    trail: Option<String>,
}

/// `GET /api/progress?trail=...`
pub async fn list_progress(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<TrailQuery>,
) -> Result<Json<Value>, ApiError> {
    let trail = query
        .trail
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation {
            message: "trail é obrigatório".to_string(),
        })?;

    let records = state.progress.list_for_trail(auth.user_id(), &trail).await?;
    let records: Vec<ProgressInfo> = records.into_iter().map(ProgressInfo::from).collect();
    Ok(Json(json!({ "success": true, "records": records })))
}

/// `POST /api/progress`
pub async fn save_progress(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let update = ProgressUpdate::new(auth.user_id(), body.trail, body.activity_id, body.completed)?;
    let record = state.progress.upsert(&update).await?;
    Ok(Json(json!({ "success": true, "record": ProgressInfo::from(record) })))
}

//! Zunzun feed.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use clubee_content::{NewZunzun, Zunzun};
use serde_json::json;

use crate::auth::{AppState, RequireAuth};
use crate::error::ApiError;
use crate::types::{NewZunzunRequest, ZunzunInfo};

/// `GET /api/zunzuns`, newest first.
pub async fn list_zunzuns(
    State(state): State<AppState>,
) -> Result<Json<Vec<ZunzunInfo>>, ApiError> {
    let zunzuns = state.zunzuns.list_recent().await?;
    Ok(Json(zunzuns.into_iter().map(ZunzunInfo::from).collect()))
}

/// `POST /api/zunzuns`
pub async fn create_zunzun(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    body: Result<Json<NewZunzunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let draft = NewZunzun::new(body.text, body.is_anonymous)?;
    let zunzun = Zunzun::publish(draft, auth.user_id(), auth.user().display_name());
    state.zunzuns.create(&zunzun).await?;

    tracing::info!(zunzun_id = %zunzun.id, anonymous = zunzun.is_anonymous, "zunzun published");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "zunzun": ZunzunInfo::from(zunzun) })),
    ))
}

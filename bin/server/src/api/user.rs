//! The signed-in user.

use axum::{Json, response::IntoResponse};
use serde_json::json;

use crate::auth::OptionalAuth;
use crate::error::{ApiError, NOT_AUTHENTICATED};
use crate::types::UserInfo;

/// `GET /api/user/me`
pub async fn me(OptionalAuth(auth): OptionalAuth) -> Result<impl IntoResponse, ApiError> {
    let auth = auth.ok_or(ApiError::Unauthenticated {
        message: NOT_AUTHENTICATED,
    })?;
    Ok(Json(json!({
        "success": true,
        "user": UserInfo::from(auth.user()),
    })))
}

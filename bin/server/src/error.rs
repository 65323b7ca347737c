//! HTTP error taxonomy.
//!
//! Library errors are mapped into [`ApiError`], which renders the JSON
//! bodies the browser app expects. Storage details are logged here and never
//! sent to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use clubee_content::ContentError;
use clubee_platform_access::StoreError;
use rootcause::Report;
use serde_json::json;

/// Message for `/api/user/me` without a session.
pub const NOT_AUTHENTICATED: &str = "Não autenticado";

/// Message for protected routes without a session.
pub const NOT_AUTHORIZED: &str = "Não autorizado";

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The OAuth handshake failed; the browser goes to the failure page.
    AuthFailure { redirect_to: String },
    /// No valid session.
    Unauthenticated { message: &'static str },
    /// The request was malformed or failed validation.
    Validation { message: String },
    /// A store operation failed.
    Storage {
        message: &'static str,
        details: String,
    },
}

impl ApiError {
    pub fn storage(message: &'static str, details: impl std::fmt::Display) -> Self {
        Self::Storage {
            message,
            details: details.to_string(),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        if err.is_validation() {
            Self::Validation {
                message: err.to_string(),
            }
        } else {
            Self::storage("Erro ao salvar conteúdo", err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}

impl From<Report<StoreError>> for ApiError {
    fn from(report: Report<StoreError>) -> Self {
        Self::storage("Erro interno do servidor", report)
    }
}

impl From<Report<ContentError>> for ApiError {
    fn from(report: Report<ContentError>) -> Self {
        Self::storage("Erro interno do servidor", report)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthFailure { redirect_to } => Redirect::to(&redirect_to).into_response(),
            Self::Unauthenticated { message } => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            Self::Validation { message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            Self::Storage { message, details } => {
                tracing::error!(error = %details, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": message })),
                )
                    .into_response()
            }
        }
    }
}

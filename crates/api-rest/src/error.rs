//! JSON error envelope.
//!
//! Every failure is reported as `{"success": false, "error": "..."}`. Internal failures are
//! logged with their full detail but the client only sees a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use badge_core::BadgeError;
use serde::Serialize;
use utoipa::ToSchema;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Detail is logged, never returned.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("bad request: {msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorRes {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

impl From<BadgeError> for ApiError {
    fn from(e: BadgeError) -> Self {
        ApiError::Internal(format!("{e:?}: {e}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

//! API error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message returned when every candidate failed
pub const EXHAUSTED_MESSAGE: &str = "All API keys and models are exhausted or unavailable";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every provider candidate failed; `details` carries the last attempt error
    #[error("{message}")]
    Exhausted {
        message: String,
        details: Option<Value>,
    },

    /// A provider answered but the answer could not be used
    #[error("{message}")]
    MalformedOutput { message: String, raw: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn exhausted(details: Option<Value>) -> Self {
        ApiError::Exhausted {
            message: EXHAUSTED_MESSAGE.to_string(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Exhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedOutput { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::InvalidRequest(msg) => ErrorResponse {
                error: msg,
                details: None,
            },
            ApiError::Exhausted { message, details } => ErrorResponse {
                error: message,
                details,
            },
            ApiError::MalformedOutput { message, raw } => ErrorResponse {
                error: message,
                details: Some(Value::String(raw)),
            },
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Unhandled server error");
                ErrorResponse {
                    error: "Server error".to_string(),
                    details: Some(Value::String(err.to_string())),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Error body shared by every endpoint: `{"error": "...", "details": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<Value>,
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of every failed API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure at the HTTP boundary. Only the fixed public message reaches the
/// caller; internal causes are logged.
#[derive(Debug)]
pub enum ApiError {
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },
    NotFound(&'static str),
    BadRequest(&'static str),
}

impl ApiError {
    /// Adapter for `map_err` that keeps the cause for the log.
    pub fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |source| ApiError::Internal { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal { message, source } => {
                error!(error = ?source, "{message}");
                message
            }
            ApiError::NotFound(message) | ApiError::BadRequest(message) => message,
        };
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use quickthoughts_store::StoreError;
use quickthoughts_telegram::TelegramError;

/// Errors surfaced at the HTTP boundary.
///
/// Bodies are short plain text; internal details only go to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong bearer credential.
    #[error("unauthorized")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(format!("store: {e}"))
    }
}

impl From<TelegramError> for ApiError {
    fn from(e: TelegramError) -> Self {
        ApiError::Internal(format!("telegram: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            ApiError::Internal(reason) => {
                error!(reason = %reason, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
        }
    }
}

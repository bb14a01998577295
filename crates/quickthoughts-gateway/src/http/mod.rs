pub mod error;
pub mod health;
pub mod setup;
pub mod sync;
pub mod webhook;

use axum::http::StatusCode;

/// Answer for unknown paths and unsupported methods on known ones.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

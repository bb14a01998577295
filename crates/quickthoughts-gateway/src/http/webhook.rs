//! Telegram webhook endpoint: POST /webhook.
//!
//! Always answers 200 "OK" so Telegram does not redeliver, except when the
//! body is not JSON or the store fails (500).

use axum::{body::Bytes, extract::State};
use std::sync::Arc;
use tracing::debug;

use quickthoughts_telegram::update::ParseError;
use quickthoughts_telegram::{handle_update, Update};

use crate::app::AppState;
use crate::http::error::ApiError;

/// POST /webhook
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let update = match Update::parse(&body) {
        Ok(update) => update,
        Err(ParseError::Shape(e)) => {
            debug!(error = %e, "ignoring update with unrecognised shape");
            return Ok("OK");
        }
        Err(ParseError::Syntax(e)) => {
            return Err(ApiError::Internal(format!("webhook body is not JSON: {e}")));
        }
    };

    let outcome = handle_update(
        &update,
        state.config.telegram.allowed_user_id,
        &state.thoughts,
        state.messenger.as_ref(),
    )
    .await?;

    debug!(update_id = ?update.update_id, ?outcome, "webhook handled");
    Ok("OK")
}

//! One-time setup: /setup-webhook (any method).
//!
//! Points the bot's webhook at this relay and hands out the sync secret.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::app::AppState;
use crate::http::error::ApiError;

pub const SETUP_MESSAGE: &str = "Save this sync secret for your local script!";

/// /setup-webhook
pub async fn setup_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let base = match state.config.gateway.public_url.as_deref() {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => base_from_headers(&headers)
            .ok_or_else(|| ApiError::BadRequest("cannot determine public host".into()))?,
    };
    let webhook_url = format!("{base}/webhook");

    let webhook = state.messenger.set_webhook(&webhook_url).await?;
    info!(url = %webhook_url, ok = ?webhook.get("ok"), "webhook registered");

    let credential = state.credentials.load_or_provision().await?;

    let body = json!({
        "webhook": webhook,
        "syncSecret": credential.secret(),
        "message": SETUP_MESSAGE,
    });
    let pretty = serde_json::to_string_pretty(&body)
        .map_err(|e| ApiError::Internal(format!("encode setup response: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], pretty))
}

/// `<scheme>://<host>` as seen by the client, honouring reverse-proxy headers.
pub fn base_from_headers(headers: &HeaderMap) -> Option<String> {
    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            // proxies may append: "a.example, b.internal"
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let host = first("x-forwarded-host").or_else(|| first(header::HOST.as_str()))?;
    let scheme = first("x-forwarded-proto").unwrap_or("https");
    Some(format!("{scheme}://{host}"))
}

//! Pull endpoint for the sync client: GET/DELETE /sync.
//!
//! Both methods require `Authorization: Bearer <sync secret>`.

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Uri},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use quickthoughts_core::types::{SyncCredential, Thought, ThoughtId};

use crate::app::AppState;
use crate::http::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ThoughtsResponse {
    pub thoughts: Vec<Thought>,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    /// Comma-separated thought IDs. When present, only these are deleted.
    pub ids: Option<String>,
}

impl ClearParams {
    fn ids(&self) -> Option<Vec<ThoughtId>> {
        self.ids.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ThoughtId::from)
                .collect()
        })
    }
}

/// GET /sync (and any other non-DELETE method): every pending thought,
/// oldest first.
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ThoughtsResponse>, ApiError> {
    let credential = state.credentials.load().await?;
    verify_bearer(&headers, credential.as_ref())?;

    let thoughts = state.thoughts.list_sorted().await?;
    info!(count = thoughts.len(), "sync: thoughts fetched");
    Ok(Json(ThoughtsResponse { thoughts }))
}

/// DELETE /sync: delete what a fetch would return and report the count.
///
/// The query is parsed only after authentication so an anonymous caller
/// always sees 401.
pub async fn clear_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<ClearedResponse>, ApiError> {
    let credential = state.credentials.load().await?;
    verify_bearer(&headers, credential.as_ref())?;

    let Query(params) = Query::<ClearParams>::try_from_uri(&uri)
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let ids = params.ids();
    let cleared = state.thoughts.drain(ids.as_deref()).await?.len();
    info!(cleared, filtered = ids.is_some(), "sync: thoughts cleared");
    Ok(Json(ClearedResponse { cleared }))
}

/// Check `Authorization: Bearer <secret>` against the provisioned credential.
///
/// Fails closed when no credential has been provisioned yet.
pub fn verify_bearer(
    headers: &HeaderMap,
    credential: Option<&SyncCredential>,
) -> Result<(), ApiError> {
    let reject = |reason: &str| {
        warn!(reason, "sync authentication failed");
        ApiError::Unauthorized
    };

    let credential = credential.ok_or_else(|| reject("no sync credential provisioned"))?;

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject("missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| reject("Authorization header must use Bearer scheme"))?;

    if credential.verify(token) {
        Ok(())
    } else {
        Err(reject("bearer token mismatch"))
    }
}

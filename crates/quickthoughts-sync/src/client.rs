//! HTTP client for the relay's `/sync` endpoint.

use serde::Deserialize;
use tracing::{debug, warn};

use quickthoughts_core::types::{Thought, ThoughtId};

use crate::error::{Result, SyncError};

/// IDs per `DELETE /sync` request. `thought_<ms>` IDs are about 20 bytes,
/// so a batch stays near 4 KB once percent-encoded.
pub const CLEAR_BATCH: usize = 200;

#[derive(Debug, Deserialize)]
struct ThoughtsResponse {
    #[serde(default)]
    thoughts: Vec<Thought>,
}

#[derive(Debug, Deserialize)]
struct ClearedResponse {
    #[serde(default)]
    cleared: usize,
}

pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
    secret: String,
}

impl RelayClient {
    pub fn new(relay_url: &str, secret: &str) -> Result<Self> {
        let base_url = relay_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SyncError::Config(
                "relay URL is required (--relay-url or [client] relay_url)".into(),
            ));
        }
        reqwest::Url::parse(&base_url)
            .map_err(|e| SyncError::Config(format!("invalid relay URL {base_url}: {e}")))?;
        if secret.trim().is_empty() {
            return Err(SyncError::Config(
                "sync secret is required (--secret or [client] secret)".into(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            secret: secret.trim().to_string(),
        })
    }

    fn sync_url(&self) -> String {
        format!("{}/sync", self.base_url)
    }

    /// `GET /sync`: every pending thought, oldest first.
    pub async fn fetch_thoughts(&self) -> Result<Vec<Thought>> {
        debug!(url = %self.sync_url(), "fetching thoughts");
        let resp = self
            .client
            .get(self.sync_url())
            .bearer_auth(&self.secret)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let body: ThoughtsResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        Ok(body.thoughts)
    }

    /// `DELETE /sync?ids=...`: remove exactly `ids` and return how many the
    /// relay deleted. Sent in batches of [`CLEAR_BATCH`] so the query string
    /// stays well under proxy URI limits.
    pub async fn clear_thoughts(&self, ids: &[ThoughtId]) -> Result<usize> {
        let mut cleared = 0;
        for batch in ids.chunks(CLEAR_BATCH) {
            cleared += self.clear_batch(batch).await?;
        }
        Ok(cleared)
    }

    async fn clear_batch(&self, ids: &[ThoughtId]) -> Result<usize> {
        let joined = ids
            .iter()
            .map(ThoughtId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        debug!(count = ids.len(), "clearing thoughts");
        let resp = self
            .client
            .delete(self.sync_url())
            .bearer_auth(&self.secret)
            .query(&[("ids", joined.as_str())])
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let body: ClearedResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        Ok(body.cleared)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %message, "relay API error");
    Err(SyncError::Api {
        status: status.as_u16(),
        message,
    })
}

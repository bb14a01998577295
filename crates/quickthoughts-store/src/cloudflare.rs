//! Cloudflare Workers KV backend, reached through the v4 REST API.
//!
//! Lets the relay share the namespace a Worker deployment already writes to.
//! Listing pages through `cursor` until the API reports no more keys.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use quickthoughts_core::config::CloudflareKvConfig;

use crate::error::{Result, StoreError};
use crate::kv::KvStore;

/// Maximum page size accepted by the list-keys endpoint.
const LIST_PAGE_LIMIT: usize = 1000;

pub struct CloudflareKv {
    client: reqwest::Client,
    namespace_url: String,
    api_token: String,
}

impl CloudflareKv {
    pub fn new(config: &CloudflareKvConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &CloudflareKvConfig) -> Self {
        Self {
            client,
            namespace_url: format!(
                "{}/accounts/{}/storage/kv/namespaces/{}",
                config.api_url.trim_end_matches('/'),
                config.account_id,
                config.namespace_id
            ),
            api_token: config.api_token.clone(),
        }
    }

    fn value_url(&self, key: &str) -> String {
        format!("{}/values/{}", self.namespace_url, urlencoding::encode(key))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        warn!(status, body = %message, "Workers KV API error");
        Err(StoreError::Api { status, message })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: Vec<KeyEntry>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct KeyEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    cursor: Option<String>,
}

#[async_trait]
impl KvStore for CloudflareKv {
    fn name(&self) -> &str {
        "cloudflare"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(self.value_url(key))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        Ok(Some(resp.text().await?))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let resp = self
            .client
            .put(self.value_url(key))
            .bearer_auth(&self.api_token)
            .header("content-type", "text/plain")
            .body(value.to_string())
            .send()
            .await?;
        Self::check(resp).await?;
        debug!(key, "workers kv put");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.value_url(key))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(resp).await?;
        debug!(key, "workers kv delete");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let url = format!("{}/keys", self.namespace_url);
        let limit = LIST_PAGE_LIMIT.to_string();
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("prefix", prefix), ("limit", limit.as_str())];
            if let Some(ref c) = cursor {
                query.push(("cursor", c.as_str()));
            }
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.api_token)
                .query(&query)
                .send()
                .await?;
            let page: ListResponse = Self::check(resp)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::Serialization(e.to_string()))?;

            keys.extend(page.result.into_iter().map(|k| k.name));

            match page.result_info.and_then(|i| i.cursor) {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        // The API already returns lexicographic order; keep the trait contract
        // explicit regardless.
        keys.sort();
        Ok(keys)
    }
}

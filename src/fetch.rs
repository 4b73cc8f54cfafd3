//! Catalog fetch collaborator.
//!
//! The cache never talks to the network directly; it goes through the
//! [`CatalogFetcher`] trait so tests (and custom deployments) can inject
//! their own source. [`HttpFetcher`] is the production implementation:
//! exactly one GET per call, a bounded timeout, and no retries — the caller
//! decides whether to try again.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::CatalogConfig;

/// Source of the raw catalog payload.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch the full catalog listing as parsed JSON.
    ///
    /// Non-2xx responses, transport failures, timeouts, and malformed bodies
    /// all surface as errors carrying a human-readable message.
    async fn fetch(&self) -> Result<Value>;
}

/// HTTP implementation backed by [`reqwest`].
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Value> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Catalog request to {} failed", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Catalog returned HTTP {}", status.as_u16());
        }

        resp.json::<Value>()
            .await
            .context("Catalog response was not valid JSON")
    }
}

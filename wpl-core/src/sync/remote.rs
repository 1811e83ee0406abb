//! The sync server as seen from the client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{WplError, WplResult};
use crate::sync::protocol::{ErrorResponse, SyncRequest};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Remote key-value store the bridge mirrors into.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn fetch_all(&self) -> WplResult<BTreeMap<String, String>>;
    async fn upsert(&self, key: &str, value: &str) -> WplResult<()>;
    async fn delete(&self, key: &str) -> WplResult<()>;
    async fn upsert_many(&self, entries: &BTreeMap<String, String>) -> WplResult<()>;
}

/// HTTP client for wpl-server's storage endpoint.
pub struct HttpRemote {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    /// `endpoint` is the full storage URL, e.g. `http://127.0.0.1:4180/api/storage`.
    pub fn new(endpoint: impl Into<String>) -> WplResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(HttpRemote {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &SyncRequest) -> WplResult<()> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;
        check(resp).await?;
        Ok(())
    }
}

async fn check(resp: reqwest::Response) -> WplResult<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(err) => Err(WplError::Remote(err.error)),
        Err(_) => Err(WplError::Remote(format!("server returned {}", status))),
    }
}

#[async_trait]
impl Remote for HttpRemote {
    /// GET ?all=1
    async fn fetch_all(&self) -> WplResult<BTreeMap<String, String>> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("all", "1")])
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    async fn upsert(&self, key: &str, value: &str) -> WplResult<()> {
        self.post(&SyncRequest::upsert(key, value)).await
    }

    async fn delete(&self, key: &str) -> WplResult<()> {
        self.post(&SyncRequest::delete(key)).await
    }

    async fn upsert_many(&self, entries: &BTreeMap<String, String>) -> WplResult<()> {
        self.post(&SyncRequest::Bulk {
            entries: entries.clone(),
        })
        .await
    }
}

// Fetcher: the one outbound call to the job board.

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("upstream returned {status}")]
    Status { status: StatusCode },

    #[error("upstream body is not valid JSON: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UpstreamClient {
    /// Builds a client that sends `user_agent` on every request. Timeouts are
    /// the reqwest defaults.
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("invalid user agent")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET the listing, filtered by `tags=<search>` when a non-empty tag is
    /// given. Returns the body as loose JSON; shaping happens in the
    /// normalizer.
    pub async fn fetch(&self, search: Option<&str>) -> Result<Value, FetchError> {
        let mut req = self.http.get(&self.endpoint);
        if let Some(tag) = search.filter(|s| !s.is_empty()) {
            req = req.query(&[("tags", tag)]);
        }

        tracing::debug!(endpoint = %self.endpoint, search = ?search, "fetching upstream jobs");

        let response = req.send().await.map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        response.json::<Value>().await.map_err(FetchError::Body)
    }
}

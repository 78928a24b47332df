use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::errors::FetchError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use super::{FetchResponse, Fetcher};

// Some subtitle hosts refuse the default reqwest user agent
const USER_AGENT: &str = "Mozilla/5.0 (compatible; subseek/0.1)";

/// Fetcher backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Shared HTTP client with timeout and keepalive configured
    client: Client,

    /// Transport-level retry policy; a single attempt by default, so the
    /// acquisition strategy stays in charge of when to move on
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Create a fetcher that tries each URL exactly once
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_retry(timeout_secs, RetryPolicy::none())
    }

    /// Create a fetcher that retries transport failures per the policy
    pub fn with_retry(timeout_secs: u64, retry: RetryPolicy) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            // Keep connections alive across the candidate probes
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        HttpFetcher { client, retry }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(e.to_string())
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse { status, body })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(30)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<FetchResponse, FetchError> {
        // Reject junk before it reaches the network
        if Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        retry_with_backoff(&self.retry, || self.fetch_once(url)).await
    }
}

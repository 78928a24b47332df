/*!
 * Fetch implementations used by subtitle acquisition.
 *
 * The acquisition strategy never talks to the network directly: it goes
 * through the `Fetcher` trait, so tests can script responses and embedders
 * can substitute their own transport:
 * - `http::HttpFetcher` - reqwest-backed implementation
 * - `mock::MockFetcher` - scripted responses with a request log
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::FetchError;

/// Outcome of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text
    pub body: String,
}

impl FetchResponse {
    /// Create a response - used by tests and fetcher implementations
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        FetchResponse {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Common trait for anything that can fetch text over HTTP
///
/// A completed exchange is `Ok` even when the status signals failure, so the
/// caller can react to the code; `Err` is reserved for transport problems
/// where no response arrived at all.
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Fetch a URL and decode the body as text
    ///
    /// # Arguments
    /// * `url` - Absolute URL to request
    ///
    /// # Returns
    /// * `Result<FetchResponse, FetchError>` - The completed exchange or a transport error
    async fn fetch_text(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

pub mod http;
pub mod mock;

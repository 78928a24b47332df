/*!
 * Mock fetcher for testing.
 *
 * Responses are scripted per URL ahead of time and every request is
 * recorded in order, so tests can assert both what came back and exactly
 * which URLs were probed:
 * - `MockFetcher::new().script_srt(url, body)` - serve a 200 with a body
 * - `MockFetcher::script_status(url, status)` - serve an empty status reply
 * - `MockFetcher::script_transport_error(url, msg)` - fail before any response
 *
 * Unscripted URLs answer 404 with an empty body.
 */

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::FetchError;
use super::{FetchResponse, Fetcher};

/// What a scripted URL should do when requested
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Complete the exchange with this status and body
    Reply { status: u16, body: String },
    /// Fail at the transport level before any response arrives
    TransportError(String),
    /// Fail with a timeout
    TimeoutError(String),
}

/// Fetcher that serves scripted replies and records every request.
/// Clones share the same script and log.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Scripted replies keyed by exact URL
    scripted: Arc<Mutex<HashMap<String, MockReply>>>,

    /// Every requested URL, in call order
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Create a fetcher with nothing scripted; every request answers 404
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an arbitrary reply for a URL
    pub fn script(self, url: &str, reply: MockReply) -> Self {
        self.scripted.lock().insert(url.to_string(), reply);
        self
    }

    /// Script a successful SRT download
    pub fn script_srt(self, url: &str, body: &str) -> Self {
        self.script(
            url,
            MockReply::Reply {
                status: 200,
                body: body.to_string(),
            },
        )
    }

    /// Script a status-only reply with an empty body
    pub fn script_status(self, url: &str, status: u16) -> Self {
        self.script(
            url,
            MockReply::Reply {
                status,
                body: String::new(),
            },
        )
    }

    /// Script a transport failure
    pub fn script_transport_error(self, url: &str, message: &str) -> Self {
        self.script(url, MockReply::TransportError(message.to_string()))
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of requests made so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().push(url.to_string());

        let reply = self.scripted.lock().get(url).cloned();
        match reply {
            Some(MockReply::Reply { status, body }) => Ok(FetchResponse { status, body }),
            Some(MockReply::TransportError(message)) => Err(FetchError::Transport(message)),
            Some(MockReply::TimeoutError(message)) => Err(FetchError::Timeout(message)),
            None => Ok(FetchResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

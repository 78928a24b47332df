/*!
 * Generic retry with linear backoff.
 *
 * Nothing in here knows about subtitles or HTTP: any fallible async
 * operation can be wrapped. The wait before retry number N is N times the
 * base delay, so a 500ms base waits 500ms, then 1s, then 1.5s.
 */

use std::future::Future;
use std::time::Duration;
use log::warn;

/// How often to retry and how long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one, never zero
    pub max_attempts: u32,

    /// Base delay the linear backoff multiplies
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; a zero attempt count is bumped to one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A policy that tries exactly once and never waits
    pub fn none() -> Self {
        RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before the next attempt once `completed_attempts` have failed
    pub fn delay_for(&self, completed_attempts: u32) -> Duration {
        self.base_delay.saturating_mul(completed_attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_millis(1000))
    }
}

/// Run `operation` until it succeeds or the policy is out of attempts,
/// sleeping the policy's linear backoff between attempts. The error of the
/// last attempt is the one surfaced.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= policy.max_attempts {
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {}/{} failed: {}; retrying in {}ms",
                    attempt,
                    policy.max_attempts,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

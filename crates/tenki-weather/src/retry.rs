//! Backoff for forecast requests.
//!
//! Transient failures are retried: timeouts, refused connections, 5xx, 408
//! and 429. Every other outcome goes straight back to the caller.

use std::future::Future;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry; doubles each time
    pub initial_delay: Duration,
    /// Ceiling for any single wait, including server-requested ones
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3, 100, 5_000)
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Wait before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doubled = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        doubled.min(self.max_delay)
    }

    /// Wait after `response`: the server's `Retry-After` seconds when given,
    /// otherwise the normal backoff. Either way capped at `max_delay`.
    fn wait_after(&self, attempt: u32, response: Option<&Response>) -> Duration {
        response
            .and_then(retry_after)
            .map(|d| d.min(self.max_delay))
            .unwrap_or_else(|| self.backoff(attempt))
    }
}

pub fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

pub fn is_transient_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    error.status().is_some_and(is_transient_status)
}

/// `Retry-After` in its delay-seconds form. HTTP dates are ignored.
fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Send with `send` until the outcome is final or the retries are spent.
///
/// The last outcome is returned as is, so a response still carrying a 503
/// after the final attempt comes back as `Ok` for the caller to inspect.
pub async fn send_with_backoff<F, Fut>(
    config: &RetryConfig,
    send: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let attempts = config.max_retries + 1;
    let mut attempt: u32 = 0;
    loop {
        let outcome = send().await;
        let transient = match &outcome {
            Ok(response) => is_transient_status(response.status()),
            Err(e) => is_transient_error(e),
        };

        if !transient {
            if attempt > 0 && outcome.is_ok() {
                tracing::info!("Forecast request went through on attempt {}", attempt + 1);
            }
            return outcome;
        }
        if attempt + 1 >= attempts {
            tracing::error!("Forecast request still failing after {} attempts", attempts);
            return outcome;
        }

        let wait = config.wait_after(attempt, outcome.as_ref().ok());
        match &outcome {
            Ok(response) => tracing::warn!(
                status = %response.status(),
                "Attempt {}/{} failed, retrying in {:?}",
                attempt + 1,
                attempts,
                wait
            ),
            Err(e) => tracing::warn!(
                "Attempt {}/{} failed: {}, retrying in {:?}",
                attempt + 1,
                attempts,
                e,
                wait
            ),
        }
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay, Duration::from_millis(100));
        assert_eq!(config.max_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = RetryConfig::new(10, 100, 1000);
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(800));
        assert_eq!(config.backoff(4), Duration::from_millis(1000));
        assert_eq!(config.backoff(40), Duration::from_millis(1000));
    }

    #[test]
    fn test_wait_without_response_uses_backoff() {
        let config = RetryConfig::new(3, 50, 1000);
        assert_eq!(config.wait_after(2, None), Duration::from_millis(200));
    }

    #[test]
    fn test_transient_statuses() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::REQUEST_TIMEOUT,
        ] {
            assert!(is_transient_status(status), "{status}");
        }
        for status in [StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND] {
            assert!(!is_transient_status(status), "{status}");
        }
    }
}

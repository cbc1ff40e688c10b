//! HTTP transport seam used by [`super::DiscordClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Request};
use std::time::Duration;
use tracing::warn;

use crate::errors::DiscordError;
use crate::routes::template::redact_token;

/// Discord's per-bucket reset delay, in seconds with millisecond precision.
pub const RATE_LIMIT_RESET_AFTER: &str = "x-ratelimit-reset-after";

/// Status, rate-limit hint and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Seconds to wait, from `Retry-After` or `X-RateLimit-Reset-After`.
    pub retry_after: Option<f64>,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_retry_after(mut self, seconds: f64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read the retry delay from response headers. `Retry-After` wins over the bucket reset.
#[must_use]
pub fn retry_after_from_headers(headers: &HeaderMap) -> Option<f64> {
    [RETRY_AFTER.as_str(), RATE_LIMIT_RESET_AFTER]
        .into_iter()
        .filter_map(|name| headers.get(name)?.to_str().ok()?.trim().parse::<f64>().ok())
        .find(|secs| secs.is_finite() && *secs >= 0.0)
}

/// Sends one fully built request and returns the raw response.
///
/// Implementations do not retry, queue, or wait on rate limits.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<TransportResponse, DiscordError>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscordError::HttpError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse, DiscordError> {
        // Token routes carry the webhook token in the path.
        let path = redact_token(request.url().path());
        let resp = self.client.execute(request).await.map_err(|e| {
            let e = e.without_url();
            warn!("HTTP request to {} failed: {}", path, e);
            DiscordError::HttpError(format!("{path}: {e}"))
        })?;

        let status = resp.status().as_u16();
        let retry_after = retry_after_from_headers(resp.headers());
        let body = resp.text().await.map_err(|e| {
            DiscordError::HttpError(format!("{path}: reading body: {}", e.without_url()))
        })?;
        Ok(TransportResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn reads_retry_after_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_from_headers(&headers), None);

        headers.insert(RATE_LIMIT_RESET_AFTER, HeaderValue::from_static("1.234"));
        assert_eq!(retry_after_from_headers(&headers), Some(1.234));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after_from_headers(&headers), Some(3.0));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_from_headers(&headers), Some(1.234));
    }

    #[tokio::test]
    async fn connection_errors_do_not_leak_the_webhook_token() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let url = reqwest::Url::parse("http://127.0.0.1:1/api/v10/webhooks/1/SUPERSECRETTOKEN").unwrap();
        let request = Request::new(reqwest::Method::GET, url);

        let err = transport.send(request).await.unwrap_err();
        let text = format!("{err} {err:?}");
        assert!(matches!(err, DiscordError::HttpError(_)));
        assert!(!text.contains("SUPERSECRETTOKEN"), "token leaked: {text}");
        assert!(text.contains("/api/v10/webhooks/1/***"), "{text}");
    }
}

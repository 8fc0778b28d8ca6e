//! Document download with bounded retries on server errors.

use crate::error::SentimentError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use speech_align_core::SentimentConfig;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Statuses worth another attempt.
const RETRY_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Downloads the document body at `url`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, SentimentError>;
}

/// Attempt budget and fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt < self.max_attempts && RETRY_STATUSES.contains(&status)
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    /// # Errors
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SentimentError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, policy })
    }

    /// Builds a fetcher from the `[sentiment]` configuration section.
    ///
    /// # Errors
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn from_config(config: &SentimentConfig) -> Result<Self, SentimentError> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                backoff: Duration::from_millis(config.backoff_ms),
            },
        )
    }

    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, SentimentError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.bytes().await?;
                debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                return Ok(body.to_vec());
            }

            if !self.policy.should_retry(status, attempt) {
                return Err(SentimentError::http(status.as_u16(), attempt));
            }

            warn!(
                "Fetching {} returned {}, retrying in {:?} (attempt {}/{})",
                url, status, self.policy.backoff, attempt, self.policy.max_attempts
            );
            tokio::time::sleep(self.policy.backoff).await;
        }
    }
}

//! Playlist download
//!
//! [`Fetcher`] is the seam between the catalog and the network. The HTTP
//! implementation retries rate-limited and failed requests with exponential
//! backoff and enforces a body size limit while streaming.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Document fetch failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server answered with a non-success status
    #[error("HTTP error: {0}")]
    Status(u16),
    /// Connection, timeout or body read failure
    #[error("Network error: {0}")]
    Network(String),
    /// Body larger than the configured limit
    #[error("Playlist too large (limit {limit_mb}MB)")]
    TooLarge { limit_mb: usize },
}

/// Resolves a URL to document text
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    max_size_mb: usize,
}

impl HttpFetcher {
    pub fn new(
        user_agent: &str,
        timeout_ms: u64,
        max_retries: u32,
        max_size_mb: usize,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .gzip(true)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_retries,
            max_size_mb,
        })
    }

    fn max_bytes(&self) -> u64 {
        (self.max_size_mb as u64) * 1024 * 1024
    }

    async fn send_with_retry(&self, url: &str) -> Result<reqwest::Response, TransportError> {
        let mut attempt = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                        let backoff_ms = backoff_ms(attempt);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "429", "backoff_ms" = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(TransportError::Status(status.as_u16()));
                }
                Err(err) => {
                    if attempt < self.max_retries {
                        let backoff_ms = backoff_ms(attempt);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "network", "backoff_ms" = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(TransportError::Network(err.to_string()));
                }
            }
        }
    }
}

/// 500ms, 1s, 2s, ... capped at 10s
fn backoff_ms(attempt: u32) -> u64 {
    (1u64 << attempt.min(16)).saturating_mul(500).min(10_000)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self.send_with_retry(url).await?;
        let max_bytes = self.max_bytes();

        if let Some(len) = response.content_length() {
            if len > max_bytes {
                return Err(TransportError::TooLarge {
                    limit_mb: self.max_size_mb,
                });
            }
            tracing::info!("Playlist size: {:.2} MB", len as f64 / 1024.0 / 1024.0);
        }

        // Content-Length can be absent or wrong, so the limit is also checked per chunk
        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
            if (body.len() + chunk.len()) as u64 > max_bytes {
                return Err(TransportError::TooLarge {
                    limit_mb: self.max_size_mb,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

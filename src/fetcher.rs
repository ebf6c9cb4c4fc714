use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::ScanConfig;
use crate::error::ConfigError;

/// Why a URL could not be inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "status", rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    ConnectionError,
    NonOkStatus(u16),
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::ConnectionError => write!(f, "connection error"),
            FailureReason::NonOkStatus(status) => write!(f, "non-OK status {}", status),
            FailureReason::Other => write!(f, "other error"),
        }
    }
}

/// Result of fetching a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Only produced for HTTP 200
    Success { status_code: u16, body: String },
    Failure(FailureReason),
}

/// Anything that can retrieve a page body for classification.
///
/// Implementations must not panic or return transport errors: every problem
/// is folded into [`FetchOutcome::Failure`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome;
}

/// Fetches pages over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http_client: Client,
}

impl HttpFetcher {
    /// Build the shared HTTP client from the scan configuration
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());

        // Add proxy if specified
        if let Some(proxy_url) = &config.proxy {
            log::debug!("Using proxy: {}", proxy_url);
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            http_client: client_builder.build()?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        // Malformed URLs never reach the network
        if let Err(e) = Url::parse(url) {
            log::warn!("Failed to check {}: invalid URL ({})", url, e);
            return FetchOutcome::Failure(FailureReason::Other);
        }

        log::debug!("Fetching: {}", url);

        let response = match self
            .http_client
            .get(url)
            .header(ACCEPT, "text/html")
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Failed to check {}: {}", url, e);
                return FetchOutcome::Failure(reason_for(&e));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("Failed to check {}: status {}", url, status.as_u16());
            return FetchOutcome::Failure(FailureReason::NonOkStatus(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                status_code: status.as_u16(),
                body,
            },
            Err(e) => {
                log::warn!("Failed to read body of {}: {}", url, e);
                FetchOutcome::Failure(reason_for(&e))
            }
        }
    }
}

fn reason_for(err: &reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else if err.is_connect() {
        FailureReason::ConnectionError
    } else {
        FailureReason::Other
    }
}

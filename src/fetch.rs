//! HTTP page fetching.
//!
//! The crawler only talks to the [`Fetcher`] trait so tests can serve pages
//! from memory. [`HttpFetcher`] is the reqwest-backed implementation.

use crate::config::CrawlConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

/// Identifying User-Agent sent with every request
pub const USER_AGENT: &str = concat!("audit-page/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: usize = 10;

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Requested URL
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Why a fetch produced no page
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS/certificate error: {0}")]
    Tls(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Serializable tag for a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    InvalidUrl,
    Timeout,
    Connect,
    Tls,
    Status,
    Body,
    Other,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl(_) => FetchErrorKind::InvalidUrl,
            FetchError::Timeout(_) => FetchErrorKind::Timeout,
            FetchError::Connect(_) => FetchErrorKind::Connect,
            FetchError::Tls(_) => FetchErrorKind::Tls,
            FetchError::Status { .. } => FetchErrorKind::Status,
            FetchError::Body(_) => FetchErrorKind::Body,
            FetchError::Other(_) => FetchErrorKind::Other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL is dropped so a path like `/ssl-guide` cannot look like a TLS failure
        let err = err.without_url();
        let message = error_chain(&err);
        if err.is_builder() {
            FetchError::InvalidUrl(message)
        } else if err.is_timeout() {
            FetchError::Timeout(message)
        } else if is_tls_failure(&message) {
            FetchError::Tls(message)
        } else if err.is_connect() {
            FetchError::Connect(message)
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(message)
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else {
            FetchError::Other(message)
        }
    }
}

/// reqwest wraps the rustls failure a few levels down; flatten the chain so
/// certificate problems can be told apart from plain connection refusals.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_tls_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Source of page bodies for the crawler
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed fetcher. Certificate verification is always enabled.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &CrawlConfig) -> Result<Self, FetchError> {
        Self::new(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        )
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        ::log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchResponse {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_detection() {
        assert!(is_tls_failure("invalid peer certificate: UnknownIssuer"));
        assert!(is_tls_failure("error trying to connect: TLS handshake eof"));
        assert!(!is_tls_failure("connection refused"));
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_tls_whatever_the_path() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2), Duration::from_secs(2)).unwrap();
        let err = fetcher
            .fetch("http://127.0.0.1:1/ssl-certificate-guide")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Connect);
        assert!(!err.to_string().contains("ssl-certificate-guide"));
    }

    #[test]
    fn test_kind_and_status() {
        let err = FetchError::Status { status: 404 };
        assert_eq!(err.kind(), FetchErrorKind::Status);
        assert_eq!(err.status(), Some(404));
        assert_eq!(FetchError::Timeout("x".into()).status(), None);
    }

    #[test]
    fn test_user_agent_is_identifying() {
        assert!(USER_AGENT.starts_with("audit-page/"));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_an_error_not_a_panic() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::InvalidUrl);
    }
}

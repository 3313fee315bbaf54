//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the identifying user agent
//! - GET requests with bounded time and redirect limits
//! - Reading the body only for HTML responses
//! - Error classification into a human-readable failure reason

use crate::config::CrawlConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::future::Future;
use thiserror::Error;
use url::Url;

/// A response received for a crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code of the final response (after redirects)
    pub status_code: u16,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Response body; empty unless the response is HTML
    pub body: String,
}

impl FetchedPage {
    /// Whether the body should be scanned for links
    ///
    /// A response without a Content-Type is given the benefit of the doubt.
    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type.as_deref())
    }
}

/// Reasons a fetch produced no usable response
///
/// The `Display` output is the failure reason surfaced on the error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Redirect error: {0}")]
    Redirect(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_redirect() {
            FetchError::Redirect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Transport capability used by the worker pool
///
/// `fetch` must be bounded in time; the pool never retries.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent, timeouts, redirect limit)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_health::config::CrawlConfig;
/// use link_health::crawler::build_http_client;
/// use url::Url;
///
/// let config = CrawlConfig::new(Url::parse("https://example.com/").unwrap());
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if is_html_content_type(content_type.as_deref()) {
            response.text().await?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            status_code,
            content_type,
            body,
        })
    }
}

fn is_html_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        Some(value) => value.to_ascii_lowercase().contains("html"),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> CrawlConfig {
        CrawlConfig::new(Url::parse("https://example.com/").unwrap())
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type(Some("text/html")));
        assert!(is_html_content_type(Some("text/html; charset=utf-8")));
        assert!(is_html_content_type(Some("TEXT/HTML")));
        assert!(is_html_content_type(Some("application/xhtml+xml")));
        assert!(is_html_content_type(None));

        assert!(!is_html_content_type(Some("application/pdf")));
        assert!(!is_html_content_type(Some("image/png")));
        assert!(!is_html_content_type(Some("application/json")));
    }

    #[test]
    fn test_fetched_page_is_html() {
        let page = FetchedPage {
            status_code: 200,
            content_type: Some("image/png".to_string()),
            body: String::new(),
        };
        assert!(!page.is_html());
    }

    #[test]
    fn test_fetch_error_reasons() {
        assert_eq!(FetchError::Timeout.to_string(), "Request timeout");
        assert_eq!(
            FetchError::Connect("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(FetchError::Request(String::new()).to_string(), "");
    }
}

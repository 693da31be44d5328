//! HTTP fetcher with rate limiting and charset detection
//!
//! Features:
//! - Rate limiting with governor
//! - Charset detection from the Content-Type header or the HTML meta tag
//! - Base URL override so tests can point the fetcher at a mock server
//!
//! Failed requests are not retried: callers treat a failed page as empty.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use regex::Regex;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client, Response,
};
use std::num::NonZeroU32;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use super::PageFetcher;
use crate::config::SourceConfig;
use crate::utils::error::FetchError;

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_\-]+)"#).unwrap());

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("quizharvest/", env!("CARGO_PKG_VERSION"));

/// Rate-limited HTTP page fetcher
pub struct HttpFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// User agent header value
    user_agent: String,

    /// Optional base URL for resolving relative requests (tests)
    base_url: Option<Url>,
}

impl HttpFetcher {
    /// Create a fetcher with default settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(requests_per_second: u32) -> Result<Self, FetchError> {
        Self::with_config(requests_per_second, Duration::from_secs(30), DEFAULT_USER_AGENT)
    }

    /// Create a fetcher from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::with_config(
            config.requests_per_second,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
        )
    }

    /// Create a fetcher with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        requests_per_second: u32,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            user_agent: user_agent.to_string(),
            base_url: None,
        })
    }

    /// Create a fetcher that resolves relative URLs against `base_url`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` does not parse
    pub fn with_base_url(base_url: &str, requests_per_second: u32) -> Result<Self, FetchError> {
        let mut fetcher = Self::new(requests_per_second)?;
        let base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        fetcher.base_url = Some(base);
        Ok(fetcher)
    }

    /// Resolve the request URL, applying the base URL for relative input
    fn resolve_url(&self, url: &str) -> Result<Url, FetchError> {
        match Url::parse(url) {
            Ok(parsed) => Ok(parsed),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(url)
                    .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}"))),
                None => Err(FetchError::InvalidUrl(url.to_string())),
            },
            Err(e) => Err(FetchError::InvalidUrl(format!("{url}: {e}"))),
        }
    }

    /// Fetch a page and decode it to UTF-8
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let target = self.resolve_url(url)?;

        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %target, "Fetching page");

        let response = self
            .client
            .get(target.clone())
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %target, status = status.as_u16(), "Unexpected status");
            return Err(FetchError::Status(status.as_u16()));
        }

        self.decode_response(response).await
    }

    async fn decode_response(&self, response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await?;

        Ok(decode_bytes(&bytes, &content_type))
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        headers
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_page(url).await
    }
}

/// Decode a response body to UTF-8
///
/// The charset comes from the Content-Type header, then from a
/// `<meta charset>` tag in the first kilobyte, then defaults to UTF-8.
/// Malformed sequences are replaced with U+FFFD and logged.
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> String {
    let encoding = charset_from_content_type(content_type)
        .or_else(|| charset_from_meta(bytes))
        .unwrap_or(UTF_8);

    let (cow, used, had_errors) = encoding.decode(bytes);

    if had_errors {
        tracing::warn!(encoding = used.name(), "Replaced malformed bytes while decoding page");
    }

    cow.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .find_map(|label| Encoding::for_label(label.trim_matches('"').as_bytes()))
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    META_CHARSET_REGEX
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
}

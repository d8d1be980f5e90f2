//! Manifest transport - abstraction over how manifest bodies are retrieved
//!
//! The fetcher only needs "give me the body at this URL or tell me why not".
//! Production uses [`HttpTransport`]; tests plug in stubs that count calls.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Trait for manifest transports
#[async_trait]
pub trait ManifestTransport: Send + Sync {
    /// Fetch the body at `url`
    ///
    /// Implementations map non-success responses to [`FetchError::Status`]
    /// and transport failures to [`FetchError::Network`].
    async fn get(&self, url: &str) -> Result<String, FetchError>;

    /// Transport identifier for logging
    fn name(&self) -> &'static str;
}

/// HTTP transport over reqwest
///
/// Every request carries a `t=<unix_ms>` cache-busting parameter and
/// `Cache-Control: no-store`, so a freshly published manifest is never
/// masked by an intermediate cache.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport; `timeout` of `None` keeps reqwest's default
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::network("<client>", e))?;

        Ok(Self { client })
    }
}

/// Append the cache-busting timestamp to a manifest URL
pub fn cache_busted(url: &str, unix_ms: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={unix_ms}")
}

#[async_trait]
impl ManifestTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let request_url = cache_busted(url, chrono::Utc::now().timestamp_millis());
        debug!("GET {}", request_url);

        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

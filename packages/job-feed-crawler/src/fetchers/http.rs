//! HTTP feed fetcher.
//!
//! One GET per call with a bounded timeout. Status handling maps the
//! response onto [`FetchError`] so the orchestrator can decide what to do;
//! nothing is retried here.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult, FetchError, FetchResult};
use crate::traits::fetcher::FeedFetcher;
use crate::types::raw::RawFeedPayload;

/// Fetches category feeds over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use job_feed_crawler::{CrawlConfig, HttpFeedFetcher, FeedFetcher};
///
/// let fetcher = HttpFeedFetcher::from_config(&CrawlConfig::default())?;
/// let payload = fetcher.fetch("https://remoteok.com/remote-rust-jobs.json").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    user_agent: String,
    referer: Option<String>,
}

impl HttpFeedFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> CrawlResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self {
            client,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            referer: None,
        })
    }

    /// Create a fetcher with the config's timeout, agent and referer.
    pub fn from_config(config: &CrawlConfig) -> CrawlResult<Self> {
        Ok(Self::new(config.request_timeout)?
            .with_user_agent(config.user_agent.clone())
            .with_referer(format!("{}/", config.base_url.trim_end_matches('/'))))
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send a Referer header with every request.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Underlying client, shared with the policy gate.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, feed_url: &str) -> FetchResult<RawFeedPayload> {
        debug!(url = %feed_url, "HTTP fetch starting");

        let mut request = self
            .client
            .get(feed_url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json");
        if let Some(referer) = &self.referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %feed_url, error = %e, "HTTP request failed");
            transport_error(e)
        })?;

        if let Some(err) = status_error(response.status()) {
            return Err(err);
        }

        let body = response.text().await.map_err(transport_error)?;
        let payload = RawFeedPayload::parse(&body)?;

        debug!(
            url = %feed_url,
            entries = payload.len(),
            skipped = payload.skipped,
            "Feed fetched"
        );

        Ok(payload)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Unavailable(e.to_string())
    }
}

/// Map a response status onto a fetch error; `None` for 2xx.
fn status_error(status: StatusCode) -> Option<FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(FetchError::Throttled)
    } else if !status.is_success() {
        Some(FetchError::Unavailable(format!("HTTP {}", status)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::OK).is_none());
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS),
            Some(FetchError::Throttled)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND),
            Some(FetchError::Unavailable(reason)) if reason.contains("404")
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY),
            Some(FetchError::Unavailable(_))
        ));
    }

    #[test]
    fn test_from_config_sets_referer() {
        let config = CrawlConfig::default().with_base_url("https://remoteok.com/");
        let fetcher = HttpFeedFetcher::from_config(&config).unwrap();

        assert_eq!(fetcher.referer.as_deref(), Some("https://remoteok.com/"));
        assert_eq!(fetcher.user_agent, config.user_agent);
        assert_eq!(fetcher.name(), "http");
    }
}

//! Typed errors for the job feed crawler.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure class. Only [`CrawlError`] is fatal to a run; everything else is
//! logged and absorbed by the orchestrator.

use thiserror::Error;

/// Errors that abort a crawl before it starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// No categories configured, nothing to crawl
    #[error("no categories configured")]
    NoCategories,

    /// Configuration violates an invariant
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Base URL could not be parsed
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from fetching a single category feed.
///
/// None of these abort the run; the affected category is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Source answered 429 Too Many Requests
    #[error("throttled by source (429)")]
    Throttled,

    /// Non-2xx status or transport failure
    #[error("feed unavailable: {0}")]
    Unavailable(String),

    /// Body is not parseable JSON
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Failure to load the robots policy. Never fatal: the gate fails closed.
#[derive(Debug, Error)]
pub enum PolicyLoadError {
    /// Transport failure or timeout
    #[error("policy request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Server error while serving the policy document
    #[error("policy endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// Policy URL could not be derived from the site URL
    #[error("invalid policy URL: {0}")]
    Url(#[source] url::ParseError),
}

/// Errors writing the accumulated records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for crawl setup.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for feed fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for sink writes.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

//! Feed fetcher trait.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::raw::RawFeedPayload;

/// Fetches one category feed.
///
/// Implementations make a single attempt per call. Retry and backoff policy
/// belongs to the orchestrator, so a 429 must surface as
/// [`FetchError::Throttled`](crate::error::FetchError::Throttled) rather than
/// being retried here.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// GET `feed_url` and decode its entries.
    async fn fetch(&self, feed_url: &str) -> FetchResult<RawFeedPayload>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "feed"
    }
}

//! Feed fetcher implementations.
//!
//! - `HttpFeedFetcher` - reqwest-based fetcher for the live source
//! - `MockFeedFetcher` (in [`crate::testing`]) - canned responses for tests

mod http;

pub use http::HttpFeedFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::FeedFetcher;

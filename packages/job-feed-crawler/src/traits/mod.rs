//! Core trait abstractions for the crawler.
//!
//! These are the seams between the orchestrator and the outside world:
//! network fetches, the crawl policy, timed pauses and the output file.
//! Each has a production implementation and a mock in [`crate::testing`].

pub mod fetcher;
pub mod pacer;
pub mod policy;
pub mod sink;

//! Testing utilities including mock implementations.
//!
//! These let applications and tests drive the orchestrator without network
//! access or real sleeping.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult, SinkError, SinkResult};
use crate::traits::{fetcher::FeedFetcher, pacer::Pacer, policy::PolicyGate, sink::RecordSink};
use crate::types::raw::{RawFeedPayload, RawJobEntry};
use crate::types::record::CanonicalJobRecord;

/// Mock feed fetcher with canned responses per URL.
///
/// # Example
///
/// ```rust
/// use job_feed_crawler::testing::MockFeedFetcher;
/// use job_feed_crawler::RawJobEntry;
///
/// let mock = MockFeedFetcher::new()
///     .with_feed("https://remoteok.com/remote-jobs.json", vec![RawJobEntry::new("1")]);
/// assert_eq!(mock.fetch_call_count(), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockFeedFetcher {
    /// Canned responses indexed by URL
    responses: Arc<RwLock<HashMap<String, FetchResult<RawFeedPayload>>>>,
    /// URLs requested, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFeedFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `entries` for `url` (builder pattern).
    pub fn with_feed(self, url: impl Into<String>, entries: Vec<RawJobEntry>) -> Self {
        self.set_response(url, Ok(RawFeedPayload::from_entries(entries)));
        self
    }

    /// Fail requests for `url` with `error` (builder pattern).
    pub fn with_error(self, url: impl Into<String>, error: FetchError) -> Self {
        self.set_response(url, Err(error));
        self
    }

    /// Set or replace the response for a URL.
    pub fn set_response(&self, url: impl Into<String>, response: FetchResult<RawFeedPayload>) {
        self.responses.write().unwrap().insert(url.into(), response);
    }

    /// Get the number of fetches made.
    pub fn fetch_call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get the URLs fetched, in order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    async fn fetch(&self, feed_url: &str) -> FetchResult<RawFeedPayload> {
        self.calls.write().unwrap().push(feed_url.to_string());

        self.responses
            .read()
            .unwrap()
            .get(feed_url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Unavailable(format!("HTTP 404 Not Found: {}", feed_url))))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Policy gate with a fixed answer, plus an explicit deny list.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyGate {
    deny_everything: bool,
    denied: HashSet<String>,
}

impl StaticPolicyGate {
    /// Allow every URL.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Deny every URL, as a gate whose policy failed to load does.
    pub fn deny_all() -> Self {
        Self {
            deny_everything: true,
            denied: HashSet::new(),
        }
    }

    /// Deny one URL (builder pattern).
    pub fn deny(mut self, url: impl Into<String>) -> Self {
        self.denied.insert(url.into());
        self
    }
}

impl PolicyGate for StaticPolicyGate {
    fn is_allowed(&self, url: &str) -> bool {
        !self.deny_everything && !self.denied.contains(url)
    }
}

/// Pacer that records requested pauses and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    pauses: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pause requested, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.read().unwrap().clone()
    }

    /// Sum of all requested pauses.
    pub fn total(&self) -> Duration {
        self.pauses.read().unwrap().iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.write().unwrap().push(duration);
    }
}

/// In-memory sink, optionally failing every write.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<RwLock<Vec<CanonicalJobRecord>>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes always fail with an I/O error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Records written so far.
    pub fn records(&self) -> Vec<CanonicalJobRecord> {
        self.records.read().unwrap().clone()
    }
}

impl RecordSink for MemorySink {
    fn write(&self, records: &[CanonicalJobRecord]) -> SinkResult<usize> {
        if self.fail {
            return Err(SinkError::Io {
                path: "memory".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "sink configured to fail"),
            });
        }
        self.records.write().unwrap().extend_from_slice(records);
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_serves_and_records() {
        let mock = MockFeedFetcher::new()
            .with_feed("https://x/a.json", vec![RawJobEntry::new("1")])
            .with_error("https://x/b.json", FetchError::Throttled);

        assert_eq!(mock.fetch("https://x/a.json").await.unwrap().len(), 1);
        assert_eq!(mock.fetch("https://x/b.json").await.unwrap_err(), FetchError::Throttled);
        assert!(matches!(
            mock.fetch("https://x/c.json").await,
            Err(FetchError::Unavailable(_))
        ));
        assert_eq!(
            mock.fetch_calls(),
            vec!["https://x/a.json", "https://x/b.json", "https://x/c.json"]
        );
    }

    #[test]
    fn test_static_gate() {
        let gate = StaticPolicyGate::allow_all().deny("https://x/b.json");

        assert!(gate.is_allowed("https://x/a.json"));
        assert!(!gate.is_allowed("https://x/b.json"));
        assert!(!StaticPolicyGate::deny_all().is_allowed("https://x/a.json"));
    }

    #[tokio::test]
    async fn test_recording_pacer() {
        let pacer = RecordingPacer::new();
        pacer.pause(Duration::from_secs(2)).await;
        pacer.pause(Duration::from_secs(10)).await;

        assert_eq!(pacer.pauses().len(), 2);
        assert_eq!(pacer.total(), Duration::from_secs(12));
    }
}

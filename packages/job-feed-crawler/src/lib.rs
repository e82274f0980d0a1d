//! Job Feed Crawler
//!
//! Collects job postings from a source that publishes one JSON feed per
//! category, normalizes them into a canonical schema and deduplicates them
//! across feeds until a target count is reached.
//!
//! # Politeness
//!
//! - robots.txt is loaded once; if it cannot be loaded every URL is denied
//! - one request in flight at a time
//! - a randomized delay between categories, a longer cooldown after a 429
//! - categories are visited in a shuffled order
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_feed_crawler::{CrawlConfig, CrawlOrchestrator, CsvSink, HttpFeedFetcher, RecordSink, RobotsPolicyGate};
//!
//! let config = CrawlConfig::from_env()?;
//! let fetcher = HttpFeedFetcher::from_config(&config)?;
//! let base = url::Url::parse(&config.base_url)?;
//! let gate = RobotsPolicyGate::load(fetcher.client(), &base, &config.user_agent).await;
//!
//! let outcome = CrawlOrchestrator::new(config.clone(), fetcher, gate)?.run().await;
//! CsvSink::new(&config.output_path).write(&outcome.records)?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams: fetcher, policy gate, pacer, sink
//! - [`types`] - Canonical record, raw feed entries, crawl targets
//! - [`policy`] - robots.txt parsing and the fail-closed gate
//! - [`fetchers`] - HTTP feed fetcher
//! - [`normalizer`] - Raw entry to canonical record
//! - [`ledger`] - Cross-feed dedup
//! - [`orchestrator`] - The crawl loop
//! - [`sinks`] - CSV output
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod fetchers;
pub mod ledger;
pub mod normalizer;
pub mod orchestrator;
pub mod policy;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::CrawlConfig;
pub use error::{CrawlError, FetchError, PolicyLoadError, SinkError};
pub use traits::{
    fetcher::FeedFetcher,
    pacer::{Pacer, TokioPacer},
    policy::PolicyGate,
    sink::RecordSink,
};
pub use types::{
    raw::{RawFeedPayload, RawJobEntry, RawTags},
    record::CanonicalJobRecord,
    target::CrawlTarget,
};

pub use fetchers::HttpFeedFetcher;
pub use ledger::DedupLedger;
pub use normalizer::{normalize, normalize_at};
pub use orchestrator::{
    CategoryOutcome, CategoryReport, CrawlOrchestrator, CrawlOutcome, CrawlPhase, CrawlReport,
    StopReason,
};
pub use policy::{PolicyStatus, RobotsPolicyGate, RobotsTxt};
pub use sinks::CsvSink;

// Re-export testing utilities
pub use testing::{MemorySink, MockFeedFetcher, RecordingPacer, StaticPolicyGate};

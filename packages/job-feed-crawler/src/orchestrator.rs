//! Crawl orchestrator.
//!
//! Drives the whole run as a single sequential loop:
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Done
//! ```
//!
//! Categories are visited once each, in a shuffled order. For every category
//! the policy gate is consulted, the feed is fetched, each entry is
//! normalized and passed through the dedup ledger. A randomized politeness
//! delay separates consecutive fetches and a longer cooldown follows a 429.
//! The run ends when the target count is reached or the list is exhausted.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::CrawlConfig;
use crate::error::{CrawlResult, FetchError};
use crate::ledger::DedupLedger;
use crate::normalizer::normalize;
use crate::traits::{
    fetcher::FeedFetcher,
    pacer::{Pacer, TokioPacer},
    policy::PolicyGate,
};
use crate::types::raw::RawFeedPayload;
use crate::types::record::CanonicalJobRecord;
use crate::types::target::CrawlTarget;

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Built, not started
    Idle,
    /// Visiting categories
    Running,
    /// Cooling down after a 429
    Paused,
    /// Target reached or categories exhausted
    Done,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlPhase::Idle => "idle",
            CrawlPhase::Running => "running",
            CrawlPhase::Paused => "paused",
            CrawlPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Exhausted,
}

/// What happened to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Feed fetched and ingested
    Fetched {
        /// Object entries in the feed
        entries: usize,
        /// Newly accepted records
        accepted: usize,
        /// Entries whose id was already accepted
        duplicates: usize,
        /// Entries without a usable id
        dropped: usize,
    },
    /// robots policy disallowed the feed; no request made
    PolicyDenied,
    /// Source answered 429; category abandoned after the cooldown
    Throttled,
    /// Timeout, unavailable or malformed; category abandoned
    Failed(FetchError),
}

/// Outcome for a named category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub outcome: CategoryOutcome,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub stop_reason: StopReason,

    /// Categories handled, in visit order
    pub categories: Vec<CategoryReport>,

    /// Categories never reached because the target was met first
    pub unvisited: usize,

    /// Unique records collected
    pub accepted: usize,

    pub target: usize,

    /// Lifecycle phases in the order they were entered, starting at `Idle`
    pub phases: Vec<CrawlPhase>,
}

impl CrawlReport {
    /// Categories whose feed was requested.
    pub fn fetch_attempts(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.outcome != CategoryOutcome::PolicyDenied)
            .count()
    }

    pub fn policy_denied(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::PolicyDenied))
    }

    pub fn throttled(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::Throttled))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::Failed(_)))
    }

    /// Entries skipped because their id was already accepted.
    pub fn duplicates(&self) -> usize {
        self.sum_fetched(|_, duplicates, _| duplicates)
    }

    /// Entries dropped by the normalizer.
    pub fn dropped(&self) -> usize {
        self.sum_fetched(|_, _, dropped| dropped)
    }

    fn count(&self, predicate: impl Fn(&CategoryOutcome) -> bool) -> usize {
        self.categories.iter().filter(|c| predicate(&c.outcome)).count()
    }

    fn sum_fetched(&self, pick: impl Fn(usize, usize, usize) -> usize) -> usize {
        self.categories
            .iter()
            .map(|c| match c.outcome {
                CategoryOutcome::Fetched {
                    accepted,
                    duplicates,
                    dropped,
                    ..
                } => pick(accepted, duplicates, dropped),
                _ => 0,
            })
            .sum()
    }
}

/// Records and report from a finished run.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Accepted records, in acceptance order
    pub records: Vec<CanonicalJobRecord>,
    pub report: CrawlReport,
}

/// Run state owned by the orchestrator.
struct CrawlState {
    phase: CrawlPhase,
    phases: Vec<CrawlPhase>,
    remaining: VecDeque<CrawlTarget>,
    ledger: DedupLedger,
    records: Vec<CanonicalJobRecord>,
    visited: Vec<CategoryReport>,
}

impl CrawlState {
    fn target_reached(&self, target: usize) -> bool {
        self.records.len() >= target
    }
}

/// Sequential crawler over the configured categories.
///
/// # Example
///
/// ```rust,ignore
/// use job_feed_crawler::{CrawlConfig, CrawlOrchestrator, HttpFeedFetcher, RobotsPolicyGate};
///
/// let config = CrawlConfig::default().with_target(100);
/// let fetcher = HttpFeedFetcher::from_config(&config)?;
/// let gate = RobotsPolicyGate::load(fetcher.client(), &base_url, &config.user_agent).await;
/// let outcome = CrawlOrchestrator::new(config, fetcher, gate)?.run().await;
/// ```
pub struct CrawlOrchestrator {
    config: CrawlConfig,
    fetcher: Arc<dyn FeedFetcher>,
    gate: Arc<dyn PolicyGate>,
    pacer: Arc<dyn Pacer>,
    rng: Box<dyn RngCore + Send>,
    state: CrawlState,
}

impl CrawlOrchestrator {
    /// Build an orchestrator. Fails only on invalid configuration, such as an
    /// empty category list.
    pub fn new(
        config: CrawlConfig,
        fetcher: impl FeedFetcher + 'static,
        gate: impl PolicyGate + 'static,
    ) -> CrawlResult<Self> {
        config.validate()?;

        Ok(Self {
            state: CrawlState {
                phase: CrawlPhase::Idle,
                phases: vec![CrawlPhase::Idle],
                remaining: config.categories.iter().cloned().collect(),
                ledger: DedupLedger::new(),
                records: Vec::new(),
                visited: Vec::new(),
            },
            config,
            fetcher: Arc::new(fetcher),
            gate: Arc::new(gate),
            pacer: Arc::new(TokioPacer),
            rng: Box::new(StdRng::from_os_rng()),
        })
    }

    /// Replace the pacer used for delays and cooldowns.
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Arc::new(pacer);
        self
    }

    /// Replace the random source used for the shuffle and delay jitter.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Visit categories until the target is reached or the list runs out.
    pub async fn run(mut self) -> CrawlOutcome {
        self.transition(CrawlPhase::Running);

        // Vary the request pattern between runs
        self.state.remaining.make_contiguous().shuffle(&mut self.rng);

        info!(
            target = self.config.target,
            categories = self.state.remaining.len(),
            fetcher = self.fetcher.name(),
            "Starting crawl"
        );

        let stop_reason = loop {
            if self.state.target_reached(self.config.target) {
                info!(target = self.config.target, "Target reached");
                break StopReason::TargetReached;
            }
            let Some(target) = self.state.remaining.pop_front() else {
                info!("All categories visited");
                break StopReason::Exhausted;
            };

            let outcome = self.visit(&target).await;
            let charged = outcome != CategoryOutcome::PolicyDenied;
            self.state.visited.push(CategoryReport {
                category: target.category().to_string(),
                outcome,
            });

            if charged && self.has_next() {
                let delay = self.next_delay();
                debug!(delay_secs = delay.as_secs_f64(), "Sleeping");
                self.pacer.pause(delay).await;
            }
        };

        self.transition(CrawlPhase::Done);

        let report = CrawlReport {
            stop_reason,
            categories: std::mem::take(&mut self.state.visited),
            unvisited: self.state.remaining.len(),
            accepted: self.state.records.len(),
            target: self.config.target,
            phases: std::mem::take(&mut self.state.phases),
        };

        info!(
            accepted = report.accepted,
            fetches = report.fetch_attempts(),
            policy_denied = report.policy_denied(),
            throttled = report.throttled(),
            failed = report.failed(),
            duplicates = report.duplicates(),
            unvisited = report.unvisited,
            stop_reason = ?report.stop_reason,
            "Crawl finished"
        );

        CrawlOutcome {
            records: std::mem::take(&mut self.state.records),
            report,
        }
    }

    /// Handle one category: policy check, fetch, ingest.
    async fn visit(&mut self, target: &CrawlTarget) -> CategoryOutcome {
        let url = target.feed_url(&self.config.base_url);

        if !self.gate.is_allowed(&url) {
            warn!(category = %target, url = %url, "Skipping feed disallowed by robots.txt");
            return CategoryOutcome::PolicyDenied;
        }

        info!(category = %target, url = %url, "Fetching JSON feed");

        match self.fetcher.fetch(&url).await {
            Ok(payload) => self.ingest(target, payload),
            Err(FetchError::Throttled) => {
                error!(
                    category = %target,
                    cooldown_secs = self.config.throttle_cooldown.as_secs_f64(),
                    "Rate limited (429), cooling down"
                );
                self.transition(CrawlPhase::Paused);
                self.pacer.pause(self.config.throttle_cooldown).await;
                self.transition(CrawlPhase::Running);
                CategoryOutcome::Throttled
            }
            Err(e) => {
                error!(category = %target, error = %e, "Error fetching feed");
                CategoryOutcome::Failed(e)
            }
        }
    }

    /// Normalize and dedup a fetched feed. Stops accepting at the target.
    fn ingest(&mut self, target: &CrawlTarget, payload: RawFeedPayload) -> CategoryOutcome {
        let entries = payload.len();
        let mut accepted = 0;
        let mut duplicates = 0;
        let mut dropped = 0;

        for entry in &payload.entries {
            if self.state.target_reached(self.config.target) {
                break;
            }
            let Some(record) = normalize(entry, target.category()) else {
                dropped += 1;
                continue;
            };
            if self.state.ledger.accept(&record.id) {
                self.state.records.push(record);
                accepted += 1;
            } else {
                duplicates += 1;
            }
        }

        info!(
            category = %target,
            fetched = entries,
            accepted,
            duplicates,
            dropped,
            total = self.state.records.len(),
            "Extracted new jobs"
        );

        CategoryOutcome::Fetched {
            entries,
            accepted,
            duplicates,
            dropped,
        }
    }

    /// Another category will be visited after this one.
    fn has_next(&self) -> bool {
        !self.state.remaining.is_empty() && !self.state.target_reached(self.config.target)
    }

    /// Uniform politeness delay within the configured range.
    fn next_delay(&mut self) -> Duration {
        let min = self.config.delay_min.as_secs_f64();
        let max = self.config.delay_max.as_secs_f64();
        Duration::from_secs_f64(self.rng.random_range(min..=max))
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug!(from = %self.state.phase, to = %next, "Crawl phase change");
        self.state.phase = next;
        self.state.phases.push(next);
    }
}

//! Crawl configuration.

use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};
use crate::types::target::CrawlTarget;

/// Source host for the default feeds.
pub const DEFAULT_BASE_URL: &str = "https://remoteok.com";

/// Default number of unique records to collect.
pub const DEFAULT_TARGET: usize = 600;

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/raw/remoteok_raw.csv";

/// Browser-like agent sent with every request and matched against robots.txt.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Feed categories crawled by default. Broad on purpose to maximize yield.
pub const DEFAULT_CATEGORIES: [&str; 37] = [
    "remote-jobs",
    "remote-dev-jobs",
    "remote-engineer-jobs",
    "remote-exec-jobs",
    "remote-senior-jobs",
    "remote-developer-jobs",
    "remote-finance-jobs",
    "remote-sysadmin-jobs",
    "remote-java-jobs",
    "remote-golang-jobs",
    "remote-cloud-jobs",
    "remote-linux-jobs",
    "remote-sql-jobs",
    "remote-excel-jobs",
    "remote-ops-jobs",
    "remote-security-jobs",
    "remote-product-jobs",
    "remote-recruiter-jobs",
    "remote-hr-jobs",
    "remote-python-jobs",
    "remote-javascript-jobs",
    "remote-react-jobs",
    "remote-backend-jobs",
    "remote-frontend-jobs",
    "remote-full-stack-jobs",
    "remote-data-jobs",
    "remote-design-jobs",
    "remote-marketing-jobs",
    "remote-customer-support-jobs",
    "remote-sales-jobs",
    "remote-writing-jobs",
    "remote-non-tech-jobs",
    "remote-medical-jobs",
    "remote-teaching-jobs",
    "remote-legal-jobs",
    "remote-accounting-jobs",
    "remote-crypto-jobs",
];

/// Knobs for one crawl run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Scheme and host of the source, e.g. `https://remoteok.com`
    pub base_url: String,

    /// Categories to visit; shuffled at run start
    pub categories: Vec<CrawlTarget>,

    /// Stop once this many unique records are accepted
    pub target: usize,

    /// Per-request timeout for feeds and robots.txt
    pub request_timeout: Duration,

    /// Pause after a 429 response. Must exceed `delay_max`.
    pub throttle_cooldown: Duration,

    /// Lower bound of the inter-category delay
    pub delay_min: Duration,

    /// Upper bound of the inter-category delay
    pub delay_max: Duration,

    /// User-Agent header and robots.txt agent name
    pub user_agent: String,

    /// Where the CSV sink writes
    pub output_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| CrawlTarget::new(*c)).collect(),
            target: DEFAULT_TARGET,
            request_timeout: Duration::from_secs(20),
            throttle_cooldown: Duration::from_secs(10),
            delay_min: Duration::from_secs(2),
            delay_max: Duration::from_secs(4),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl CrawlConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from optional environment variables.
    ///
    /// A `.env` file in the working directory is loaded first; variables
    /// already set in the process environment take precedence over it.
    /// Every variable falls back to its default; none are required.
    pub fn from_env() -> CrawlResult<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from a variable lookup, e.g. the process environment
    /// or the pairs of a parsed `.env` file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CrawlResult<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("JOB_CRAWLER_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(target) = lookup("JOB_CRAWLER_TARGET") {
            config.target = target.trim().parse().map_err(|_| CrawlError::InvalidConfig {
                reason: format!("JOB_CRAWLER_TARGET must be a number, got {target:?}"),
            })?;
        }
        if let Some(output) = lookup("JOB_CRAWLER_OUTPUT") {
            config.output_path = PathBuf::from(output);
        }
        if let Some(user_agent) = lookup("JOB_CRAWLER_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(categories) = lookup("JOB_CRAWLER_CATEGORIES") {
            config.categories = parse_categories(&categories);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the source base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the category list.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(CrawlTarget::new).collect();
        self
    }

    /// Set the target record count.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the cooldown applied after a 429.
    pub fn with_throttle_cooldown(mut self, cooldown: Duration) -> Self {
        self.throttle_cooldown = cooldown;
        self
    }

    /// Set the inter-category delay range.
    pub fn with_delay_range(mut self, min: Duration, max: Duration) -> Self {
        self.delay_min = min;
        self.delay_max = max;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the CSV output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check the invariants the orchestrator relies on.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.categories.is_empty() {
            return Err(CrawlError::NoCategories);
        }
        url::Url::parse(&self.base_url).map_err(|source| CrawlError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if self.delay_min > self.delay_max {
            return Err(CrawlError::InvalidConfig {
                reason: format!(
                    "delay range is inverted: {:?} > {:?}",
                    self.delay_min, self.delay_max
                ),
            });
        }
        if self.throttle_cooldown <= self.delay_max {
            return Err(CrawlError::InvalidConfig {
                reason: format!(
                    "throttle cooldown {:?} must exceed the maximum delay {:?}",
                    self.throttle_cooldown, self.delay_max
                ),
            });
        }
        Ok(())
    }
}

/// Split a comma-separated category list, dropping blanks.
fn parse_categories(raw: &str) -> Vec<CrawlTarget> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(CrawlTarget::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = CrawlConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.categories.len(), 37);
        assert_eq!(config.target, 600);
        assert!(config.throttle_cooldown > config.delay_max);
    }

    #[test]
    fn test_empty_categories_rejected() {
        let config = CrawlConfig::new().with_categories(Vec::<String>::new());
        assert!(matches!(config.validate(), Err(CrawlError::NoCategories)));
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let config = CrawlConfig::new().with_delay_range(Duration::from_secs(5), Duration::from_secs(1));
        assert!(matches!(config.validate(), Err(CrawlError::InvalidConfig { .. })));
    }

    #[test]
    fn test_short_cooldown_rejected() {
        let config = CrawlConfig::new().with_throttle_cooldown(Duration::from_secs(3));
        assert!(matches!(config.validate(), Err(CrawlError::InvalidConfig { .. })));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let config = CrawlConfig::new().with_base_url("not a url");
        assert!(matches!(config.validate(), Err(CrawlError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_dotenv_file_supplies_target_and_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "JOB_CRAWLER_TARGET=5\nJOB_CRAWLER_CATEGORIES=a,b\n").unwrap();

        let vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|pair| pair.unwrap())
            .collect();
        let config = CrawlConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.target, 5);
        assert_eq!(config.categories, vec![CrawlTarget::new("a"), CrawlTarget::new("b")]);
    }

    #[test]
    fn test_unset_variables_keep_defaults() {
        let config = CrawlConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CrawlConfig::default());
    }

    #[test]
    fn test_non_numeric_target_rejected() {
        let result = CrawlConfig::from_lookup(|key| {
            (key == "JOB_CRAWLER_TARGET").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(CrawlError::InvalidConfig { .. })));
    }

    #[test]
    fn test_parse_categories() {
        let parsed = parse_categories(" remote-jobs, ,remote-rust-jobs ,");
        assert_eq!(
            parsed,
            vec![CrawlTarget::new("remote-jobs"), CrawlTarget::new("remote-rust-jobs")]
        );
    }
}

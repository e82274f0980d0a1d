//! Robots-backed policy gate.
//!
//! The policy document is fetched once when the gate is built. Any failure to
//! load it leaves the gate fail-closed: every URL is denied for the rest of
//! the run.

use tracing::{error, info, warn};
use url::Url;

use super::robots::RobotsTxt;
use crate::error::PolicyLoadError;
use crate::traits::policy::PolicyGate;

/// How the policy document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    /// robots.txt fetched and parsed
    Loaded,
    /// Source has no robots.txt (4xx other than 401/403); everything allowed
    NotPublished,
    /// robots.txt answered 401/403; everything denied
    Forbidden,
    /// Load failed; everything denied
    Unavailable,
}

/// Policy gate for a single source host.
#[derive(Debug, Clone)]
pub struct RobotsPolicyGate {
    origin: Url,
    user_agent: String,
    robots: RobotsTxt,
    status: PolicyStatus,
}

impl RobotsPolicyGate {
    /// Fetch `{base}/robots.txt` once and build the gate.
    ///
    /// Never fails: a load error yields a gate that denies everything.
    pub async fn load(client: &reqwest::Client, base_url: &Url, user_agent: &str) -> Self {
        match fetch_robots_txt(client, base_url, user_agent).await {
            Ok((robots, status)) => {
                info!(
                    origin = %base_url,
                    status = ?status,
                    sitemaps = robots.sitemaps().len(),
                    "Loaded crawl policy"
                );
                if let Some(delay) = robots.crawl_delay(user_agent) {
                    info!(crawl_delay = ?delay, "robots.txt declares a crawl delay");
                }
                Self::with_status(base_url.clone(), user_agent, robots, status)
            }
            Err(e) => {
                error!(origin = %base_url, error = %e, "Failed to load robots.txt, denying all URLs");
                Self::fail_closed(base_url.clone(), user_agent)
            }
        }
    }

    /// Build a gate from an already-parsed policy.
    pub fn from_robots(origin: Url, user_agent: impl Into<String>, robots: RobotsTxt) -> Self {
        Self::with_status(origin, user_agent, robots, PolicyStatus::Loaded)
    }

    /// A gate whose policy could not be loaded.
    pub fn fail_closed(origin: Url, user_agent: impl Into<String>) -> Self {
        Self::with_status(origin, user_agent, RobotsTxt::deny_all(), PolicyStatus::Unavailable)
    }

    fn with_status(
        origin: Url,
        user_agent: impl Into<String>,
        robots: RobotsTxt,
        status: PolicyStatus,
    ) -> Self {
        Self {
            origin,
            user_agent: user_agent.into(),
            robots,
            status,
        }
    }

    /// How the policy was obtained.
    pub fn status(&self) -> PolicyStatus {
        self.status
    }

    /// Parsed policy in effect.
    pub fn robots(&self) -> &RobotsTxt {
        &self.robots
    }

    fn same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.origin.scheme()
            && url.host_str() == self.origin.host_str()
            && url.port_or_known_default() == self.origin.port_or_known_default()
    }
}

impl PolicyGate for RobotsPolicyGate {
    fn is_allowed(&self, url: &str) -> bool {
        if self.status == PolicyStatus::Unavailable {
            return false;
        }

        let Ok(parsed) = Url::parse(url) else {
            warn!(url = %url, "Unparseable URL, treating as disallowed");
            return false;
        };

        // Another host's policy is unknown
        if !self.same_origin(&parsed) {
            return false;
        }

        let path = match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        };

        let allowed = self.robots.is_allowed(&self.user_agent, &path);
        if !allowed {
            warn!(url = %url, "robots.txt disallows URL");
        }
        allowed
    }
}

/// Fetch and parse robots.txt for a site.
///
/// 401/403 means the site forbids crawling; any other 4xx means no policy is
/// published. Server errors and transport failures are load errors.
pub async fn fetch_robots_txt(
    client: &reqwest::Client,
    site_url: &Url,
    user_agent: &str,
) -> Result<(RobotsTxt, PolicyStatus), PolicyLoadError> {
    let url = robots_url(site_url)?;

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await
        .map_err(PolicyLoadError::Http)?;

    let status = response.status();
    if status.is_success() {
        let content = response.text().await.map_err(PolicyLoadError::Http)?;
        return Ok((RobotsTxt::parse(&content), PolicyStatus::Loaded));
    }

    match status.as_u16() {
        401 | 403 => Ok((RobotsTxt::deny_all(), PolicyStatus::Forbidden)),
        400..=499 => Ok((RobotsTxt::allow_all(), PolicyStatus::NotPublished)),
        code => Err(PolicyLoadError::Status { status: code }),
    }
}

/// The well-known policy location at the root of the site's origin.
fn robots_url(site_url: &Url) -> Result<Url, PolicyLoadError> {
    site_url.join("/robots.txt").map_err(PolicyLoadError::Url)
}

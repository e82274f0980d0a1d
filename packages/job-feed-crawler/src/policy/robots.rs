//! Robots.txt parser and checker.

use std::collections::HashMap;
use std::time::Duration;

/// Parsed robots.txt rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsTxt {
    /// Rules per user-agent token (lowercase)
    rules: HashMap<String, AgentRules>,

    /// Default rules (for *)
    default_rules: AgentRules,

    /// First crawl delay seen in the file, in seconds
    crawl_delay: Option<f64>,

    /// Sitemaps listed
    sitemaps: Vec<String>,
}

/// Rules for one user-agent group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRules {
    /// Allow/Disallow lines in file order
    rules: Vec<PathRule>,

    /// Crawl delay for this agent
    crawl_delay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathRule {
    prefix: String,
    allow: bool,
}

impl AgentRules {
    fn merge(&mut self, other: &AgentRules) {
        self.rules.extend(other.rules.iter().cloned());
        if self.crawl_delay.is_none() {
            self.crawl_delay = other.crawl_delay;
        }
    }

    /// Longest matching prefix decides; `Allow` wins a tie. No match allows.
    fn is_allowed(&self, path: &str) -> bool {
        self.rules
            .iter()
            .filter(|rule| path.starts_with(&rule.prefix))
            .max_by(|a, b| {
                a.prefix
                    .len()
                    .cmp(&b.prefix.len())
                    .then(a.allow.cmp(&b.allow))
            })
            .map(|rule| rule.allow)
            .unwrap_or(true)
    }
}

impl RobotsTxt {
    /// Parse robots.txt content.
    ///
    /// Consecutive `User-agent` lines share the group that follows them. A
    /// group ends at the next `User-agent` line after at least one rule.
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules = AgentRules::default();
        let mut in_rules = false;

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if in_rules {
                        robots.store_group(&current_agents, &current_rules);
                        current_agents.clear();
                        current_rules = AgentRules::default();
                        in_rules = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" => {
                    in_rules = true;
                    // Empty Disallow means "allow everything"; it adds no rule
                    if !value.is_empty() {
                        current_rules.rules.push(PathRule {
                            prefix: value.to_string(),
                            allow: directive == "allow",
                        });
                    }
                }
                "crawl-delay" => {
                    in_rules = true;
                    if let Ok(delay) = value.parse::<f64>() {
                        current_rules.crawl_delay = Some(delay);
                        if robots.crawl_delay.is_none() {
                            robots.crawl_delay = Some(delay);
                        }
                    }
                }
                "sitemap" => {
                    robots.sitemaps.push(value.to_string());
                }
                _ => {}
            }
        }

        robots.store_group(&current_agents, &current_rules);
        robots
    }

    /// A policy that denies every path.
    pub fn deny_all() -> Self {
        let mut robots = Self::default();
        robots.default_rules.rules.push(PathRule {
            prefix: "/".to_string(),
            allow: false,
        });
        robots
    }

    /// A policy that allows every path.
    pub fn allow_all() -> Self {
        Self::default()
    }

    fn store_group(&mut self, agents: &[String], rules: &AgentRules) {
        for agent in agents.iter().filter(|a| !a.is_empty()) {
            if agent == "*" {
                self.default_rules.merge(rules);
            } else {
                self.rules.entry(agent.clone()).or_default().merge(rules);
            }
        }
    }

    /// Pick the group for a user agent: exact product token, then any group
    /// whose token appears in the agent string, then `*`.
    fn rules_for(&self, user_agent: &str) -> &AgentRules {
        let agent_lower = user_agent.to_lowercase();
        let token = agent_lower.split('/').next().unwrap_or("").trim();

        self.rules
            .get(token)
            .or_else(|| {
                // Check for partial matches
                self.rules
                    .iter()
                    .filter(|(k, _)| agent_lower.contains(k.as_str()))
                    .max_by_key(|(k, _)| k.len())
                    .map(|(_, v)| v)
            })
            .unwrap_or(&self.default_rules)
    }

    /// Check if a path is allowed for a user-agent.
    pub fn is_allowed(&self, user_agent: &str, path: &str) -> bool {
        self.rules_for(user_agent).is_allowed(path)
    }

    /// Get crawl delay for a user-agent.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        self.rules_for(user_agent)
            .crawl_delay
            .or(self.crawl_delay)
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Get listed sitemaps.
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Check if robots.txt disallows all crawling.
    pub fn disallows_all(&self, user_agent: &str) -> bool {
        !self.is_allowed(user_agent, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REMOTEOK_LIKE: &str = r#"
# Feeds are public, the admin area is not
User-agent: *
Disallow: /remote-crypto-jobs
Disallow: /admin
Allow: /admin/status
Crawl-delay: 1.5

User-agent: jobbot
User-agent: feedbot
Disallow: /remote-
Crawl-delay: 5

Sitemap: https://remoteok.com/sitemap.xml
Sitemap: https://remoteok.com/sitemap-jobs.xml
"#;

    #[test]
    fn test_feed_policy_for_default_group() {
        let robots = RobotsTxt::parse(REMOTEOK_LIKE);

        assert!(robots.is_allowed("Mozilla/5.0", "/remote-python-jobs.json"));
        assert!(!robots.is_allowed("Mozilla/5.0", "/remote-crypto-jobs.json"));
        assert!(!robots.is_allowed("Mozilla/5.0", "/admin/users"));
        assert!(robots.is_allowed("Mozilla/5.0", "/admin/status"));
        assert_eq!(robots.sitemaps().len(), 2);
    }

    #[test]
    fn test_crawl_delay_follows_matched_group() {
        let robots = RobotsTxt::parse(REMOTEOK_LIKE);

        assert_eq!(robots.crawl_delay("FeedBot/3"), Some(Duration::from_secs(5)));
        assert_eq!(robots.crawl_delay("Mozilla/5.0"), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_group_selection_order() {
        let content = r#"
User-agent: *
Disallow: /

User-agent: jobbot
Disallow: /private

User-agent: bot
Disallow: /feeds
"#;
        let robots = RobotsTxt::parse(content);

        // Exact product token
        assert!(robots.is_allowed("JobBot/1.0", "/feeds.json"));
        assert!(!robots.is_allowed("JobBot/1.0", "/private"));
        // Longest key contained in the agent string
        assert!(robots.is_allowed("Mozilla/5.0 (compatible; jobbot)", "/feeds.json"));
        assert!(!robots.is_allowed("Mozilla/5.0 (compatible; otherbot)", "/feeds.json"));
        // Fallback to *
        assert!(!robots.is_allowed("Crawler/2.0", "/remote-jobs.json"));
    }

    #[test]
    fn test_grouped_user_agents_share_rules() {
        let content = r#"
User-agent: alphabot
User-agent: betabot
Disallow: /jobs

User-agent: *
Allow: /
        "#;

        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("alphabot", "/jobs.json"));
        assert!(!robots.is_allowed("BetaBot/2.1", "/jobs.json"));
        assert!(robots.is_allowed("gammabot", "/jobs.json"));
    }

    #[test]
    fn test_longest_match_wins_regardless_of_order() {
        let allow_first = "User-agent: *\nAllow: /remote-dev-jobs\nDisallow: /remote-\n";
        let disallow_first = "User-agent: *\nDisallow: /remote-\nAllow: /remote-dev-jobs\n";

        for content in [allow_first, disallow_first] {
            let robots = RobotsTxt::parse(content);
            assert!(robots.is_allowed("Bot", "/remote-dev-jobs.json"));
            assert!(!robots.is_allowed("Bot", "/remote-sales-jobs.json"));
        }
    }

    #[test]
    fn test_allow_wins_tie() {
        let content = "User-agent: *\nDisallow: /feed\nAllow: /feed\n";
        assert!(RobotsTxt::parse(content).is_allowed("Bot", "/feed.json"));
    }

    #[test]
    fn test_narrower_disallow_beats_broad_allow() {
        let content = "User-agent: *\nAllow: /\nDisallow: /remote-crypto-jobs\n";
        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("Bot", "/remote-crypto-jobs.json"));
        assert!(robots.is_allowed("Bot", "/remote-jobs.json"));
    }

    #[test]
    fn test_comments_stripped() {
        let content = "User-agent: * # everyone\nDisallow: /tmp # scratch\n";
        let robots = RobotsTxt::parse(content);

        assert!(!robots.is_allowed("Bot", "/tmp/x"));
        assert!(robots.is_allowed("Bot", "/other"));
    }

    #[test]
    fn test_blank_agent_line_matches_nobody() {
        let content = "User-agent:\nDisallow: /\n";
        let robots = RobotsTxt::parse(content);

        assert!(robots.is_allowed("AnyBot", "/remote-jobs.json"));
        assert_eq!(robots, RobotsTxt::allow_all());
    }

    #[test]
    fn test_root_disallow_with_feed_exception() {
        let content = "User-agent: *\nDisallow: /\nAllow: /remote-jobs.json\n";
        let robots = RobotsTxt::parse(content);

        assert!(robots.disallows_all("Bot"));
        assert!(robots.is_allowed("Bot", "/remote-jobs.json"));
        assert!(!robots.is_allowed("Bot", "/remote-dev-jobs.json"));
    }

    #[test]
    fn test_constructed_policies() {
        assert!(RobotsTxt::deny_all().disallows_all("Bot"));
        assert!(!RobotsTxt::allow_all().disallows_all("Bot"));
        assert!(RobotsTxt::allow_all().crawl_delay("Bot").is_none());
    }
}

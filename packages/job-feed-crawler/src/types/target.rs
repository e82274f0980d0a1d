//! Crawl targets - one feed category each.

use std::fmt;

/// A feed category such as `remote-python-jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget(String);

impl CrawlTarget {
    pub fn new(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    /// Category name as configured.
    pub fn category(&self) -> &str {
        &self.0
    }

    /// Feed URL for this category under `base`.
    ///
    /// Categories that already end in `json` are used verbatim.
    pub fn feed_url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        if self.0.ends_with("json") {
            format!("{}/{}", base, self.0)
        } else {
            format!("{}/{}.json", base, self.0)
        }
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CrawlTarget {
    fn from(category: &str) -> Self {
        Self::new(category)
    }
}

impl From<String> for CrawlTarget {
    fn from(category: String) -> Self {
        Self(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_appends_json() {
        let target = CrawlTarget::new("remote-python-jobs");
        assert_eq!(
            target.feed_url("https://remoteok.com/"),
            "https://remoteok.com/remote-python-jobs.json"
        );
    }

    #[test]
    fn test_feed_url_keeps_json_suffix() {
        let target = CrawlTarget::new("api.json");
        assert_eq!(target.feed_url("https://remoteok.com"), "https://remoteok.com/api.json");
    }
}

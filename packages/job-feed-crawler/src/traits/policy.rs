//! Crawl policy trait.

/// Answers whether a URL may be fetched.
///
/// The policy is loaded once; `is_allowed` is a pure query afterwards.
pub trait PolicyGate: Send + Sync {
    fn is_allowed(&self, url: &str) -> bool;
}

//! Per-run record of dispatched URLs

use std::collections::HashSet;

/// URLs already dispatched for fetching during one crawl run.
///
/// The set only grows. Every entry point checks it before fetching, so a URL
/// reachable through several parents, or through a cyclic "next" chain, is
/// fetched once.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` and return true if it was not seen yet; false otherwise.
    pub fn should_visit(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    /// Whether `url` has been dispatched
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of dispatched URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether nothing has been dispatched yet
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

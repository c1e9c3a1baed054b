//! # Mock Page Fetcher for Testing
//!
//! Provides a `MockFetcher` that implements the `PageFetcher` trait for use in
//! tests. Pages are served from memory and every request is recorded, so tests
//! can assert which URLs were fetched and how often without touching the
//! network.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::crawler::error::CrawlError;
use crate::crawler::fetcher::PageFetcher;

/// A mock fetcher serving canned HTML.
/// URLs without a page answer with a 404 status error.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    failures: HashMap<String, u16>,
    /// Requested URLs in order. Arc<Mutex<>> lets clones share the log.
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Creates a mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Answer `url` with the given status code.
    pub fn with_failure(mut self, url: impl Into<String>, status: u16) -> Self {
        self.failures.insert(url.into(), status);
        self
    }

    /// All URLs requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    /// How many times `url` was requested.
    pub async fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        self.requests.lock().await.push(url.to_string());

        if let Some(status) = self.failures.get(url) {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        self.pages.get(url).cloned().ok_or_else(|| CrawlError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

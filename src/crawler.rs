//! # Help-Center Crawler Module
//!
//! This module crawls a tree-structured help center (category → subcategory →
//! article, with paginated article listings) and materializes everything
//! reachable from one seed category into a single nested `CrawlResult`.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: Site origin, politeness settings and theme selectors
//! - `HelpCenterCrawler`: The recursive descent over the tree
//! - `VisitedSet`: Per-run deduplication of dispatched URLs
//! - `PageFetcher`: The seam between the walkers and the network
//! - `storage`: Writing and reading crawl output as JSON
//!
//! ## Features
//!
//! - Strictly sequential traversal with a fixed minimum delay between requests
//! - Bounded pagination per subcategory, configurable up to unbounded
//! - Noise removal (attachments, related articles, footers) before text extraction
//! - Graceful degradation: failed pages drop out, their siblings stay
//!
//! ## Usage
//!
//! ```rust,no_run
//! use helpcenter::crawler::{CrawlerConfig, HelpCenterCrawler, HttpFetcher};
//!
//! # async fn run() -> Result<(), helpcenter::crawler::CrawlError> {
//! let config = CrawlerConfig::default();
//! let crawler = HelpCenterCrawler::new(HttpFetcher::new(&config)?, config)?;
//! let result = crawler
//!     .crawl("https://support.allyoucanlearn.nl/hc/nl/categories/4906127425053-Voor-deelnemers")
//!     .await?;
//! println!("{} articles", result.article_count());
//! # Ok(())
//! # }
//! ```

mod config;
mod content_extraction;
mod error;
mod fetcher;
pub mod mock_fetcher;
pub mod storage;
mod visited;
mod walker;

// Re-export important types and functions
pub use config::{CrawlerConfig, CrawlerConfigBuilder, DEFAULT_BASE_URL, DEFAULT_SEED_URL, SiteSelectors};
pub use content_extraction::{
    CONTENT_UNAVAILABLE, UNKNOWN_CATEGORY, clean_content, extract_article_content, resolve_url,
};
pub use error::CrawlError;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use visited::VisitedSet;
pub use walker::{CrawlProgress, HelpCenterCrawler};

use serde::{Deserialize, Serialize};

/// A leaf page of the help center
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Link text the article was found under
    pub title: String,

    /// Absolute URL of the article
    pub url: String,

    /// Cleaned body text, or `CONTENT_UNAVAILABLE`
    pub content: String,
}

/// A listing of articles, pagination merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub title: String,
    pub url: String,

    /// First-page articles followed by those of later pages
    pub articles: Vec<Article>,
}

/// A top-level grouping of subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub url: String,
    pub subcategories: Vec<Subcategory>,
}

/// Everything one crawl run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub categories: Vec<Category>,
}

impl CrawlResult {
    /// Number of categories
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of subcategories across all categories
    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }

    /// Number of articles across all subcategories
    pub fn article_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.subcategories)
            .map(|s| s.articles.len())
            .sum()
    }
}

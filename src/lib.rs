//! # helpcenter - Help-Center Knowledge Base Crawler
//!
//! This crate crawls a public help center organized as categories, subcategories
//! (sections) and articles, and materializes the whole reachable tree into one
//! nested document that serializes to JSON.
//!
//! ## Features
//!
//! - Sequential, rate-limited traversal from a single seed category
//! - Per-run URL deduplication shared by every level of the walk
//! - Pagination of article listings merged into one ordered list
//! - Article content cleaned of attachments, related articles and footers
//! - Failed pages are skipped; partial trees instead of aborted runs
//! - Pretty JSON output plus a flattened per-article export
//!
//! ## Example
//!
//! ```rust,no_run
//! use helpcenter::crawler::{storage, CrawlerConfig, HelpCenterCrawler, HttpFetcher};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), helpcenter::Error> {
//!     let config = CrawlerConfig::builder().delay_ms(1000).build();
//!     let crawler = HelpCenterCrawler::new(HttpFetcher::new(&config)?, config)?;
//!
//!     let result = crawler
//!         .crawl("https://support.allyoucanlearn.nl/hc/nl/categories/4906127425053-Voor-deelnemers")
//!         .await?;
//!
//!     storage::write_result(Path::new("kb.json"), &result).await?;
//!     println!("Total articles: {}", result.article_count());
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::crawler::{
        Article, Category, CrawlResult, CrawlerConfig, HelpCenterCrawler, PageFetcher,
        Subcategory, VisitedSet,
    };
    pub use crate::error::Error;
    pub use crate::error::Result;
}

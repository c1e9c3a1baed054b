//! # Crawler Configuration Module
//!
//! This module provides configuration options for the help-center crawler:
//! the site origin used to resolve relative links, politeness settings for the
//! fetcher, the pagination bound and the CSS selectors describing the site's
//! theme. It uses a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct with crawler parameters
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration
//! - `SiteSelectors`: CSS selectors for category, listing and article pages
//!
//! The defaults describe a Zendesk Help Center with its stock theme.

use std::time::Duration;

/// Default site origin used to resolve relative links
pub const DEFAULT_BASE_URL: &str = "https://support.allyoucanlearn.nl";

/// Default seed category
pub const DEFAULT_SEED_URL: &str =
    "https://support.allyoucanlearn.nl/hc/nl/categories/4906127425053-Voor-deelnemers";

/// CSS selectors describing the help-center theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelectors {
    /// Heading holding the category title
    pub category_title: String,

    /// One entry per subcategory on a category page
    pub subcategory_item: String,

    /// Link inside a subcategory entry
    pub subcategory_link: String,

    /// Label inside a subcategory entry
    pub subcategory_label: String,

    /// One entry per article on a listing page
    pub article_item: String,

    /// Link inside an article entry
    pub article_link: String,

    /// The "next page" link of a paginated listing
    pub next_page: String,

    /// The article's content region
    pub content: String,

    /// Substructures stripped from the content region before text extraction
    pub noise: Vec<String>,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            category_title: "h1".to_string(),
            subcategory_item: ".section-list .section-item".to_string(),
            subcategory_link: "a".to_string(),
            subcategory_label: ".section-name".to_string(),
            article_item: ".article-list .article-item".to_string(),
            article_link: "a".to_string(),
            next_page: ".pagination-next a".to_string(),
            content: ".article-body".to_string(),
            noise: vec![
                ".attachments".to_string(),
                ".related-articles".to_string(),
                ".article-footer".to_string(),
            ],
        }
    }
}

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Site origin prepended to relative links
    pub base_url: String,

    /// Minimum delay in milliseconds between requests
    pub delay_ms: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Listing pages read per subcategory, first page included. 0 follows
    /// "next" links until none is left.
    pub max_listing_pages: u32,

    /// Selectors describing the site's markup
    pub selectors: SiteSelectors,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            delay_ms: 1000,
            user_agent: format!("helpcenter-crawler/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            max_listing_pages: 2,
            selectors: SiteSelectors::default(),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the origin used to resolve relative links
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the delay in milliseconds between requests
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout in seconds
    pub fn request_timeout_secs(mut self, request_timeout_secs: u64) -> Self {
        self.config.request_timeout_secs = request_timeout_secs;
        self
    }

    /// Set how many listing pages are read per subcategory
    pub fn max_listing_pages(mut self, max_listing_pages: u32) -> Self {
        self.config.max_listing_pages = max_listing_pages;
        self
    }

    /// Set the selector for the article content region
    pub fn content_selector(mut self, content: impl Into<String>) -> Self {
        self.config.selectors.content = content.into();
        self
    }

    /// Add selectors for noise stripped from article content
    pub fn extra_noise_selectors(mut self, noise: Vec<String>) -> Self {
        self.config.selectors.noise.extend(noise);
        self
    }

    /// Replace the whole selector set
    pub fn selectors(mut self, selectors: SiteSelectors) -> Self {
        self.config.selectors = selectors;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the delay between requests as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether a subcategory may read one more listing page after `pages_read`
    pub fn may_follow_next(&self, pages_read: u32) -> bool {
        self.max_listing_pages == 0 || pages_read < self.max_listing_pages
    }
}

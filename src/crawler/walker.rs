//! Recursive descent over the help-center tree
//!
//! `HelpCenterCrawler` walks category → subcategory → article, strictly
//! sequentially. The `VisitedSet` is passed into every step so a fresh set per
//! run (or per test) is all the state there is.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawler::content_extraction::{
    CONTENT_UNAVAILABLE, CompiledSelectors, Link, extract_article_content, parse_category,
    parse_listing,
};
use crate::crawler::error::CrawlError;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::visited::VisitedSet;
use crate::crawler::{Article, Category, CrawlResult, CrawlerConfig, Subcategory};

/// Progress notifications sent while crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlProgress {
    /// A category page is about to be fetched
    Category(String),
    /// A subcategory listing page is about to be fetched
    Subcategory(String),
    /// An article has been extracted
    Article(String),
}

/// Crawler for one help-center site
pub struct HelpCenterCrawler<F: PageFetcher> {
    fetcher: F,
    config: CrawlerConfig,
    selectors: CompiledSelectors,
    progress: Option<UnboundedSender<CrawlProgress>>,
}

impl<F: PageFetcher> HelpCenterCrawler<F> {
    /// Create a crawler, validating the base URL and selectors up front
    pub fn new(fetcher: F, config: CrawlerConfig) -> Result<Self, CrawlError> {
        Url::parse(&config.base_url)?;
        let selectors = CompiledSelectors::compile(&config.selectors)?;

        Ok(Self {
            fetcher,
            config,
            selectors,
            progress: None,
        })
    }

    /// Send progress notifications to `sender`
    pub fn with_progress(mut self, sender: UnboundedSender<CrawlProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// The configuration this crawler runs with
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl the category at `seed_url` with a fresh visited set.
    ///
    /// Only an unparsable seed URL is an error. A seed that fails to fetch
    /// yields an empty result.
    #[instrument(skip(self))]
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlResult, CrawlError> {
        let mut visited = VisitedSet::new();
        self.crawl_with(&mut visited, seed_url).await
    }

    /// Crawl the category at `seed_url`, sharing `visited` with the caller
    pub async fn crawl_with(
        &self,
        visited: &mut VisitedSet,
        seed_url: &str,
    ) -> Result<CrawlResult, CrawlError> {
        Url::parse(seed_url)?;

        let mut result = CrawlResult::default();
        if let Some(category) = self.walk_category(visited, seed_url).await {
            result.categories.push(category);
        }

        info!(
            categories = result.category_count(),
            articles = result.article_count(),
            urls = visited.len(),
            "Crawl finished"
        );
        Ok(result)
    }

    /// Fetch a category page and walk each of its subcategories
    #[instrument(skip(self, visited))]
    pub async fn walk_category(&self, visited: &mut VisitedSet, url: &str) -> Option<Category> {
        if !visited.should_visit(url) {
            debug!("Category already visited");
            return None;
        }

        info!("Crawling category: {}", url);
        self.notify(CrawlProgress::Category(url.to_string()));
        let html = self.fetch_or_skip(url).await?;
        let page = parse_category(&html, &self.selectors, &self.config.base_url);
        debug!("Found {} subcategories", page.subcategories.len());

        let mut category = Category {
            title: page.title,
            url: url.to_string(),
            subcategories: Vec::new(),
        };
        for link in page.subcategories {
            if let Some(subcategory) = self.walk_subcategory(visited, &link.url, &link.title).await
            {
                category.subcategories.push(subcategory);
            }
        }

        Some(category)
    }

    /// Fetch a subcategory listing, extract its articles and follow pagination
    #[instrument(skip(self, visited))]
    pub async fn walk_subcategory(
        &self,
        visited: &mut VisitedSet,
        url: &str,
        title: &str,
    ) -> Option<Subcategory> {
        if !visited.should_visit(url) {
            debug!("Subcategory already visited");
            return None;
        }

        info!("Crawling subcategory: {}", url);
        self.notify(CrawlProgress::Subcategory(url.to_string()));
        let html = self.fetch_or_skip(url).await?;
        let mut listing = parse_listing(&html, &self.selectors, &self.config.base_url);

        let mut subcategory = Subcategory {
            title: title.to_string(),
            url: url.to_string(),
            articles: Vec::new(),
        };

        let mut pages_read = 1;
        loop {
            self.extract_articles(visited, &listing.articles, &mut subcategory.articles)
                .await;

            let Some(next_url) = listing.next_page.take() else {
                break;
            };
            if !self.config.may_follow_next(pages_read) {
                info!(
                    "Not following {} after {} listing pages",
                    next_url, pages_read
                );
                break;
            }
            if !visited.should_visit(&next_url) {
                debug!("Next page {} already visited", next_url);
                break;
            }

            info!("Following pagination: {}", next_url);
            let Some(html) = self.fetch_or_skip(&next_url).await else {
                break;
            };
            listing = parse_listing(&html, &self.selectors, &self.config.base_url);
            pages_read += 1;
        }

        Some(subcategory)
    }

    /// Fetch one article page and clean its content region
    #[instrument(skip(self, visited))]
    pub async fn extract_article(
        &self,
        visited: &mut VisitedSet,
        url: &str,
        title: &str,
    ) -> Option<Article> {
        if !visited.should_visit(url) {
            debug!("Article already visited");
            return None;
        }

        info!("Extracting article: {}", url);
        let html = self.fetch_or_skip(url).await?;
        let content = extract_article_content(&html, &self.selectors).unwrap_or_else(|| {
            warn!("No content region found in {}", url);
            CONTENT_UNAVAILABLE.to_string()
        });
        self.notify(CrawlProgress::Article(url.to_string()));

        Some(Article {
            title: title.to_string(),
            url: url.to_string(),
            content,
        })
    }

    async fn extract_articles(
        &self,
        visited: &mut VisitedSet,
        links: &[Link],
        articles: &mut Vec<Article>,
    ) {
        for link in links {
            if let Some(article) = self.extract_article(visited, &link.url, &link.title).await {
                articles.push(article);
            }
        }
    }

    async fn fetch_or_skip(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                None
            }
        }
    }

    fn notify(&self, progress: CrawlProgress) {
        if let Some(sender) = &self.progress {
            // The receiver going away only means nobody is watching.
            let _ = sender.send(progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SiteSelectors;
    use crate::crawler::mock_fetcher::MockFetcher;

    const BASE: &str = "https://help.example.nl";

    fn config() -> CrawlerConfig {
        CrawlerConfig::builder().base_url(BASE).delay_ms(0).build()
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    fn listing(articles: &[(&str, &str)], next: Option<&str>) -> String {
        let items: String = articles
            .iter()
            .map(|(href, title)| {
                format!(r#"<li class="article-item"><a href="{}">{}</a></li>"#, href, title)
            })
            .collect();
        let pagination = next
            .map(|href| format!(r#"<li class="pagination-next"><a href="{}">Next</a></li>"#, href))
            .unwrap_or_default();
        format!(
            r#"<html><body><ul class="article-list">{}</ul><ul class="pagination">{}</ul></body></html>"#,
            items, pagination
        )
    }

    fn article(body: &str) -> String {
        format!(
            r#"<html><body><h1>t</h1><div class="article-body">{}</div></body></html>"#,
            body
        )
    }

    fn titles(subcategory: &Subcategory) -> Vec<&str> {
        subcategory.articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pagination_appends_next_page_in_order() {
        let fetcher = MockFetcher::new()
            .with_page(
                url("/s/1"),
                listing(&[("/a/1", "A1"), ("/a/2", "A2")], Some("/s/1?page=2")),
            )
            .with_page(url("/s/1?page=2"), listing(&[("/a/3", "A3")], None))
            .with_page(url("/a/1"), article("<p>een</p>"))
            .with_page(url("/a/2"), article("<p>twee</p>"))
            .with_page(url("/a/3"), article("<p>drie</p>"));
        let crawler = HelpCenterCrawler::new(fetcher.clone(), config()).unwrap();

        let mut visited = VisitedSet::new();
        let subcategory = crawler
            .walk_subcategory(&mut visited, &url("/s/1"), "Sectie")
            .await
            .unwrap();

        assert_eq!(titles(&subcategory), vec!["A1", "A2", "A3"]);
        assert_eq!(subcategory.articles[2].content, "drie");
        assert_eq!(subcategory.title, "Sectie");
        assert!(visited.contains(&url("/s/1?page=2")));
    }

    #[tokio::test]
    async fn test_visited_next_page_is_not_fetched_again() {
        let fetcher = MockFetcher::new()
            .with_page(
                url("/s/1"),
                listing(&[("/a/1", "A1"), ("/a/2", "A2")], Some("/s/1?page=2")),
            )
            .with_page(url("/s/1?page=2"), listing(&[("/a/3", "A3")], None))
            .with_page(url("/a/1"), article("een"))
            .with_page(url("/a/2"), article("twee"))
            .with_page(url("/a/3"), article("drie"));
        let crawler = HelpCenterCrawler::new(fetcher.clone(), config()).unwrap();

        let mut visited = VisitedSet::new();
        visited.should_visit(&url("/s/1?page=2"));
        let subcategory = crawler
            .walk_subcategory(&mut visited, &url("/s/1"), "Sectie")
            .await
            .unwrap();

        assert_eq!(titles(&subcategory), vec!["A1", "A2"]);
        assert_eq!(fetcher.request_count(&url("/s/1?page=2")).await, 0);
    }

    #[tokio::test]
    async fn test_self_referencing_next_link_stops() {
        let fetcher = MockFetcher::new()
            .with_page(url("/s/1"), listing(&[("/a/1", "A1")], Some("/s/1")))
            .with_page(url("/a/1"), article("een"));
        let crawler = HelpCenterCrawler::new(
            fetcher.clone(),
            CrawlerConfig::builder()
                .base_url(BASE)
                .delay_ms(0)
                .max_listing_pages(0)
                .build(),
        )
        .unwrap();

        let mut visited = VisitedSet::new();
        let subcategory = crawler
            .walk_subcategory(&mut visited, &url("/s/1"), "Sectie")
            .await
            .unwrap();

        assert_eq!(titles(&subcategory), vec!["A1"]);
        assert_eq!(fetcher.request_count(&url("/s/1")).await, 1);
    }

    #[tokio::test]
    async fn test_pagination_is_bounded_to_one_hop_by_default() {
        let fetcher = MockFetcher::new()
            .with_page(url("/s/1"), listing(&[("/a/1", "A1")], Some("/s/1?page=2")))
            .with_page(
                url("/s/1?page=2"),
                listing(&[("/a/2", "A2")], Some("/s/1?page=3")),
            )
            .with_page(url("/s/1?page=3"), listing(&[("/a/3", "A3")], None))
            .with_page(url("/a/1"), article("een"))
            .with_page(url("/a/2"), article("twee"))
            .with_page(url("/a/3"), article("drie"));

        let crawler = HelpCenterCrawler::new(fetcher.clone(), config()).unwrap();
        let subcategory = crawler
            .walk_subcategory(&mut VisitedSet::new(), &url("/s/1"), "Sectie")
            .await
            .unwrap();
        assert_eq!(titles(&subcategory), vec!["A1", "A2"]);
        assert_eq!(fetcher.request_count(&url("/s/1?page=3")).await, 0);

        let unbounded = CrawlerConfig::builder()
            .base_url(BASE)
            .delay_ms(0)
            .max_listing_pages(0)
            .build();
        let crawler = HelpCenterCrawler::new(fetcher.clone(), unbounded).unwrap();
        let subcategory = crawler
            .walk_subcategory(&mut VisitedSet::new(), &url("/s/1"), "Sectie")
            .await
            .unwrap();
        assert_eq!(titles(&subcategory), vec!["A1", "A2", "A3"]);
    }

    #[tokio::test]
    async fn test_missing_content_region_yields_placeholder() {
        let fetcher = MockFetcher::new().with_page(
            url("/a/9"),
            "<html><body><h1>Geen body</h1></body></html>",
        );
        let crawler = HelpCenterCrawler::new(fetcher, config()).unwrap();

        let article = crawler
            .extract_article(&mut VisitedSet::new(), &url("/a/9"), "Geen body")
            .await
            .unwrap();
        assert_eq!(article.title, "Geen body");
        assert_eq!(article.url, url("/a/9"));
        assert_eq!(article.content, CONTENT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_article_failure_and_duplicates_are_skipped() {
        let fetcher = MockFetcher::new()
            .with_page(
                url("/s/1"),
                listing(&[("/a/1", "A1"), ("/a/broken", "Broken"), ("/a/1", "A1 again")], None),
            )
            .with_page(url("/a/1"), article("een"))
            .with_failure(url("/a/broken"), 500);
        let crawler = HelpCenterCrawler::new(fetcher.clone(), config()).unwrap();

        let subcategory = crawler
            .walk_subcategory(&mut VisitedSet::new(), &url("/s/1"), "Sectie")
            .await
            .unwrap();
        assert_eq!(titles(&subcategory), vec!["A1"]);
        assert_eq!(fetcher.request_count(&url("/a/1")).await, 1);
        assert_eq!(fetcher.request_count(&url("/a/broken")).await, 1);
    }

    #[tokio::test]
    async fn test_failed_subcategory_is_absent_but_siblings_remain() {
        let category = r#"
            <html><body><h1>Voor deelnemers</h1>
              <ul class="section-list">
                <li class="section-item"><a href="/s/down"><span class="section-name">Kapot</span></a></li>
                <li class="section-item"><a href="/s/ok"><span class="section-name">Werkt</span></a></li>
              </ul>
            </body></html>
        "#;
        let fetcher = MockFetcher::new()
            .with_page(url("/c/1"), category)
            .with_failure(url("/s/down"), 503)
            .with_page(url("/s/ok"), listing(&[("/a/1", "A1")], None))
            .with_page(url("/a/1"), article("een"));
        let crawler = HelpCenterCrawler::new(fetcher, config()).unwrap();

        let result = crawler.crawl(&url("/c/1")).await.unwrap();
        assert_eq!(result.categories.len(), 1);
        let subcategories = &result.categories[0].subcategories;
        assert_eq!(subcategories.len(), 1);
        assert_eq!(subcategories[0].title, "Werkt");
        assert_eq!(result.article_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_seed_yields_empty_result() {
        let crawler = HelpCenterCrawler::new(MockFetcher::new(), config()).unwrap();
        let result = crawler.crawl(&url("/c/missing")).await.unwrap();
        assert!(result.categories.is_empty());
        assert_eq!(result.article_count(), 0);
    }

    #[tokio::test]
    async fn test_progress_notifications() {
        let category = r#"<h1>C</h1><ul class="section-list">
            <li class="section-item"><a href="/s/1"><span class="section-name">S</span></a></li></ul>"#;
        let fetcher = MockFetcher::new()
            .with_page(url("/c/1"), category)
            .with_page(url("/s/1"), listing(&[("/a/1", "A1")], None))
            .with_page(url("/a/1"), article("een"));
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let crawler = HelpCenterCrawler::new(fetcher, config())
            .unwrap()
            .with_progress(sender);

        crawler.crawl(&url("/c/1")).await.unwrap();
        drop(crawler);

        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                CrawlProgress::Category(url("/c/1")),
                CrawlProgress::Subcategory(url("/s/1")),
                CrawlProgress::Article(url("/a/1")),
            ]
        );
    }

    #[tokio::test]
    async fn test_unparsable_seed_is_rejected_before_fetching() {
        let fetcher = MockFetcher::new();
        let crawler = HelpCenterCrawler::new(fetcher.clone(), config()).unwrap();

        let result = crawler.crawl("not a url").await;
        assert!(matches!(result, Err(CrawlError::UrlParse(_))));
        assert!(fetcher.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_site_selectors() {
        let selectors = SiteSelectors {
            category_title: ".page-title".to_string(),
            subcategory_item: ".topics .topic".to_string(),
            subcategory_label: ".topic-name".to_string(),
            article_item: ".faq li".to_string(),
            content: "#answer".to_string(),
            noise: vec![".share".to_string()],
            ..SiteSelectors::default()
        };
        let config = CrawlerConfig::builder()
            .base_url(BASE)
            .delay_ms(0)
            .selectors(selectors)
            .build();
        let fetcher = MockFetcher::new()
            .with_page(
                url("/c/1"),
                r#"<h2 class="page-title">Studenten</h2><div class="topics">
                   <div class="topic"><a href="/s/1"><b class="topic-name">Toetsen</b></a></div></div>"#,
            )
            .with_page(
                url("/s/1"),
                r#"<ol class="faq"><li><a href="/a/1">Herkansen</a></li></ol>"#,
            )
            .with_page(
                url("/a/1"),
                r#"<main id="answer"><p>Mail de docent.</p><div class="share">Deel</div></main>"#,
            );
        let crawler = HelpCenterCrawler::new(fetcher, config).unwrap();

        let result = crawler.crawl(&url("/c/1")).await.unwrap();
        let category = &result.categories[0];
        assert_eq!(category.title, "Studenten");
        assert_eq!(category.subcategories[0].title, "Toetsen");
        let article = &category.subcategories[0].articles[0];
        assert_eq!(article.title, "Herkansen");
        assert_eq!(article.content, "Mail de docent.");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = CrawlerConfig::builder().base_url("not a url").build();
        let result = HelpCenterCrawler::new(MockFetcher::new(), config);
        assert!(matches!(result, Err(CrawlError::UrlParse(_))));
    }
}

//! Content extraction functionality for the crawler module
//!
//! Everything here is synchronous: a page body goes in, owned values come
//! out. The walkers never hold a parsed `Html` across an await.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use crate::crawler::config::SiteSelectors;
use crate::crawler::error::CrawlError;

/// Content stored for an article whose content region is missing
pub const CONTENT_UNAVAILABLE: &str = "Content could not be extracted";

/// Title used when a category page has no heading
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Elements whose text never belongs in article content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that end a line of linearized text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Parse a CSS selector, reporting the offending selector on failure
pub fn parse_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| CrawlError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// `SiteSelectors` parsed once, before the crawl starts
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    category_title: Selector,
    subcategory_item: Selector,
    subcategory_link: Selector,
    subcategory_label: Selector,
    article_item: Selector,
    article_link: Selector,
    next_page: Selector,
    content: Selector,
    noise: Vec<Selector>,
}

impl CompiledSelectors {
    /// Compile every selector, failing on the first invalid one
    pub fn compile(selectors: &SiteSelectors) -> Result<Self, CrawlError> {
        Ok(Self {
            category_title: parse_selector(&selectors.category_title)?,
            subcategory_item: parse_selector(&selectors.subcategory_item)?,
            subcategory_link: parse_selector(&selectors.subcategory_link)?,
            subcategory_label: parse_selector(&selectors.subcategory_label)?,
            article_item: parse_selector(&selectors.article_item)?,
            article_link: parse_selector(&selectors.article_link)?,
            next_page: parse_selector(&selectors.next_page)?,
            content: parse_selector(&selectors.content)?,
            noise: selectors
                .noise
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// A resolved link and its visible label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute URL
    pub url: String,

    /// Trimmed link or label text
    pub title: String,
}

/// What the walkers need from a category page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    /// Heading text, or `UNKNOWN_CATEGORY`
    pub title: String,

    /// Subcategory links in document order
    pub subcategories: Vec<Link>,
}

/// What the walkers need from one page of an article listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Article links in document order
    pub articles: Vec<Link>,

    /// Resolved "next page" link, if the listing has one
    pub next_page: Option<String>,
}

/// Resolve `href` against the site origin.
///
/// Absolute http(s) links pass through unchanged. Protocol-relative links get
/// the origin's scheme. Links with any other scheme (`mailto:`, `tel:`,
/// `javascript:`) resolve to None. Anything else is appended to the origin.
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if let Some(scheme) = href_scheme(href) {
        return (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
            .then(|| href.to_string());
    }

    let base = base_url.trim_end_matches('/');
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = base.split_once("://").map_or("https", |(scheme, _)| scheme);
        return Some(format!("{}://{}", scheme, rest));
    }

    Some(format!("{}/{}", base, href.trim_start_matches('/')))
}

/// The scheme of an absolute reference, e.g. `mailto` in `mailto:a@b.nl`
fn href_scheme(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    (starts_with_letter && chars.all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)))
        .then_some(scheme)
}

/// Visible text of an element with whitespace runs collapsed
pub fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn link_href(link: ElementRef, base_url: &str) -> Option<String> {
    link.value()
        .attr("href")
        .filter(|href| !href.trim().is_empty())
        .and_then(|href| resolve_url(base_url, href))
}

/// Extract the title and subcategory links of a category page
pub fn parse_category(html: &str, selectors: &CompiledSelectors, base_url: &str) -> CategoryPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.category_title)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    let mut subcategories = Vec::new();
    for item in document.select(&selectors.subcategory_item) {
        let Some(link) = item.select(&selectors.subcategory_link).next() else {
            warn!("Skipping subcategory entry without a link");
            continue;
        };
        let Some(url) = link_href(link, base_url) else {
            warn!("Skipping subcategory link without a fetchable href");
            continue;
        };

        let title = item
            .select(&selectors.subcategory_label)
            .next()
            .map(element_text)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| element_text(link));

        subcategories.push(Link { url, title });
    }

    CategoryPage {
        title,
        subcategories,
    }
}

/// Extract the article links and "next page" link of a listing page
pub fn parse_listing(html: &str, selectors: &CompiledSelectors, base_url: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let mut articles = Vec::new();
    for item in document.select(&selectors.article_item) {
        let Some(link) = item.select(&selectors.article_link).next() else {
            warn!("Skipping article entry without a link");
            continue;
        };
        let Some(url) = link_href(link, base_url) else {
            warn!("Skipping article link without a fetchable href");
            continue;
        };
        articles.push(Link {
            url,
            title: element_text(link),
        });
    }

    let next_page = document
        .select(&selectors.next_page)
        .next()
        .and_then(|link| link_href(link, base_url));

    ListingPage {
        articles,
        next_page,
    }
}

/// Extract the cleaned body text of an article page.
///
/// Returns None when the page has no content region.
pub fn extract_article_content(html: &str, selectors: &CompiledSelectors) -> Option<String> {
    let document = Html::parse_document(html);
    let content = document.select(&selectors.content).next()?;
    Some(clean_content(content, &selectors.noise))
}

/// Linearize the text below `root`, skipping subtrees that match `noise`.
///
/// Block-level elements end a line; each line is whitespace-collapsed and
/// trimmed, empty lines are dropped and the rest joined with `\n`. Text in
/// `pre` keeps its own line breaks and indentation.
pub fn clean_content(root: ElementRef, noise: &[Selector]) -> String {
    let mut linearizer = Linearizer {
        noise,
        lines: Vec::new(),
        current: String::new(),
    };
    linearizer.walk(root);
    linearizer.flush();
    linearizer.lines.join("\n")
}

struct Linearizer<'s> {
    noise: &'s [Selector],
    lines: Vec<String>,
    current: String,
}

impl Linearizer<'_> {
    fn walk(&mut self, element: ElementRef) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.current.push_str(text),
                Node::Element(value) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = value.name();
                    if SKIPPED_ELEMENTS.contains(&name)
                        || self.noise.iter().any(|selector| selector.matches(&child))
                    {
                        continue;
                    }

                    if name == "pre" {
                        self.flush();
                        self.push_preformatted(child);
                        continue;
                    }

                    let block = BLOCK_ELEMENTS.contains(&name);
                    if block {
                        self.flush();
                    }
                    self.walk(child);
                    if block {
                        self.flush();
                    }
                }
                _ => {}
            }
        }
    }

    fn push_preformatted(&mut self, element: ElementRef) {
        let mut raw = String::new();
        self.collect_raw(element, &mut raw);
        self.lines.extend(
            raw.lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    fn collect_raw(&self, element: ElementRef, raw: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => raw.push_str(text),
                Node::Element(value) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = value.name();
                    if SKIPPED_ELEMENTS.contains(&name)
                        || self.noise.iter().any(|selector| selector.matches(&child))
                    {
                        continue;
                    }
                    if name == "br" {
                        raw.push('\n');
                    }
                    self.collect_raw(child, raw);
                }
                _ => {}
            }
        }
    }

    fn flush(&mut self) {
        let line = collapse_whitespace(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }
}

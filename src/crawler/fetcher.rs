//! Page fetching for the crawler
//!
//! The walkers only see the `PageFetcher` trait, so tests can swap the
//! network for canned pages. `HttpFetcher` is the real implementation: one
//! GET per call, spaced by a `governor` rate limiter.

use std::future::Future;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client as ReqwestClient;
use tracing::{Instrument, debug, debug_span, instrument};

use crate::crawler::CrawlerConfig;
use crate::crawler::error::CrawlError;

/// Source of page HTML for the walkers
pub trait PageFetcher {
    /// Fetch `url` and return its body.
    ///
    /// Any transport error or non-success status is a `CrawlError` which the
    /// caller treats as "this node yields no data".
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, CrawlError>> + Send;
}

/// Fetcher backed by reqwest with a fixed minimum delay between requests
#[derive(Clone)]
pub struct HttpFetcher {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Spacing between requests; None when the configured delay is zero
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl HttpFetcher {
    /// Create a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = ReqwestClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;

        let limiter = Quota::with_period(config.delay())
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Ok(Self { client, limiter })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().instrument(debug_span!("limiter")).await;
        }

        debug!("Sending GET request to {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Failed to fetch {url}: status code {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// HTTP status code returned
        status: u16,
    },

    /// A configured CSS selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        /// The selector as configured
        selector: String,
        /// Parser message
        message: String,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::Selector { .. } | CrawlError::UrlParse(_) => {
                CrateError::InvalidConfig(err.to_string())
            }
            CrawlError::Status { .. } => CrateError::Crawl(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_maps_to_crawl() {
        let err = CrawlError::Status {
            url: "https://example.com/x".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/x: status code 404"
        );
        let crate_err: CrateError = err.into();
        assert!(matches!(crate_err, CrateError::Crawl(_)));
    }

    #[test]
    fn test_unparsable_url_maps_to_invalid_config() {
        let err: CrawlError = url::Url::parse("not a url").unwrap_err().into();
        let crate_err: CrateError = err.into();
        assert!(matches!(crate_err, CrateError::InvalidConfig(_)));
    }

    #[test]
    fn test_selector_error_maps_to_invalid_config() {
        let err = CrawlError::Selector {
            selector: "..bad".to_string(),
            message: "unexpected token".to_string(),
        };
        let crate_err: CrateError = err.into();
        assert!(matches!(crate_err, CrateError::InvalidConfig(_)));
    }
}

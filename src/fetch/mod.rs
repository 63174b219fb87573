// src/fetch/mod.rs
// =============================================================================
// This module is everything the crawler needs to know about a single page.
//
// Submodules:
// - http: Downloads a page over HTTP with reqwest
// - html: Pulls the title and the links out of downloaded HTML
// - filter: Recognizes links that point at files (pdf, zip, ...) not pages
// - limit: Wraps any Fetcher and enforces the global URL cap per page
//
// The crawler itself only ever talks to the `Fetcher` trait defined here.
// That keeps the concurrency code testable: tests plug in an in-memory
// graph instead of the network.
//
// Rust concepts:
// - Traits: A shared interface that many types can implement
// - async-trait: Async methods on traits, usable behind Arc<dyn ...>
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod filter;
mod html;
mod http;
mod limit;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use filter::is_file_link;
pub use html::extract_page;
pub use http::{FetchSettings, HttpFetcher};
pub use limit::LimitedFetcher;

/// What a fetch produces for one URL: its title and the links on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Text of the <title> element, or empty if the page has none
    pub title: String,
    /// Absolute outbound links, in the order they appear on the page
    pub links: Vec<String>,
}

/// Everything that can go wrong while fetching a page.
///
/// The crawler never gives up because of one of these. A failed page simply
/// becomes a leaf: nothing below it gets crawled.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never got a response (DNS, connect, timeout, ...)
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered, but not with a 2xx status
    #[error("HTTP {0}")]
    Status(u16),

    /// The response is not an HTML document (image, archive, ...)
    #[error("not an HTML page: '{0}'")]
    NotHtml(String),

    /// The response body could not be read as text
    #[error("could not read body: {0}")]
    Body(#[source] reqwest::Error),

    /// The page could not be parsed
    #[error("could not parse page: {0}")]
    Parse(String),

    /// The global URL cap was hit while scanning this page.
    ///
    /// `partial` holds what was collected before the cap kicked in, so the
    /// report can still show it, but none of its links are crawled.
    #[error("URL cap of {max} exceeded")]
    CapExceeded { max: usize, partial: Page },
}

impl FetchError {
    /// The part of the page that was read before the fetch gave up, if any
    pub fn into_partial(self) -> Option<Page> {
        match self {
            FetchError::CapExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// The capability the crawler uses to visit a URL.
///
/// Implementations must be safe to call from many tasks at once for
/// different URLs (hence Send + Sync).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

// Lets the crawler hold a shared fetcher (Arc<HttpFetcher>, Arc<dyn Fetcher>)
// exactly like an owned one.
#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        (**self).fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_only_for_cap_exceeded() {
        let page = Page {
            title: "Home".to_string(),
            links: vec!["https://example.com/a".to_string()],
        };
        let err = FetchError::CapExceeded { max: 1, partial: page.clone() };
        assert_eq!(err.into_partial(), Some(page));

        assert_eq!(FetchError::Status(404).into_partial(), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP 503");
        let err = FetchError::CapExceeded { max: 150, partial: Page::default() };
        assert_eq!(err.to_string(), "URL cap of 150 exceeded");
    }
}

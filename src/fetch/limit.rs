// src/fetch/limit.rs
// =============================================================================
// A Fetcher wrapper that applies the crawl-wide URL cap and the file filter.
//
// How it works:
// 1. Let the inner fetcher download and parse the page
// 2. Walk its links in order, dropping links to files (pdf, zip, ...)
// 3. Count every remaining link on the shared CrawlCounter
// 4. As soon as the counter goes over the cap, stop scanning this page and
//    return FetchError::CapExceeded with the links accepted so far
//
// The cap is soft. Many pages are scanned at the same time and they all
// share one counter without coordinating, so the crawl as a whole can end up
// a little past the cap. A single page, though, never accepts more links
// than the cap allows.
// =============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{is_file_link, FetchError, Fetcher, Page};
use crate::crawl::CrawlCounter;

/// Wraps another fetcher and enforces the global URL cap on its results.
pub struct LimitedFetcher<F> {
    inner: F,
    counter: Arc<CrawlCounter>,
    max_urls: usize,
}

impl<F: Fetcher> LimitedFetcher<F> {
    pub fn new(inner: F, counter: Arc<CrawlCounter>, max_urls: usize) -> Self {
        Self { inner, counter, max_urls }
    }

    // Keeps the links of `page` that are not files, counting each one.
    // Stops at the first link the cap does not allow.
    fn accept_links(&self, url: &str, page: Page) -> Result<Page, FetchError> {
        let Page { title, links } = page;
        let mut accepted = Vec::with_capacity(links.len());

        for link in links {
            if !self.admit(&mut accepted, link) {
                debug!(url, accepted = accepted.len(), "URL cap reached while scanning page");
                return Err(FetchError::CapExceeded {
                    max: self.max_urls,
                    partial: Page { title, links: accepted },
                });
            }
        }

        Ok(Page { title, links: accepted })
    }

    // Decides one link of a page. Returns false once the page must stop.
    //
    // The shared counter can lose increments under contention, and a stale
    // store can even move it backwards, so the page's own tally is checked
    // first. That keeps a single page at or below the cap no matter what
    // other pages do to the counter.
    fn admit(&self, accepted: &mut Vec<String>, link: String) -> bool {
        if is_file_link(&link) {
            return true;
        }

        if accepted.len() >= self.max_urls || self.counter.increment_and_check(self.max_urls) {
            return false;
        }

        accepted.push(link);
        true
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for LimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        // Once the cap is gone there is nothing to gain from downloading
        if self.counter.current() > self.max_urls {
            return Err(FetchError::CapExceeded { max: self.max_urls, partial: Page::default() });
        }

        let page = self.inner.fetch(url).await?;
        self.accept_links(url, page)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a wrapper (decorator) type?
//    - LimitedFetcher holds another Fetcher and is a Fetcher itself
//    - The crawler cannot tell the difference, so the cap can be added or
//      left out without touching the crawl code
//
// 2. Why is the per-page tally needed if we have a counter?
//    - The counter is shared and racy (see crawl/counter.rs)
//    - `accepted` belongs to this page alone, so nothing else can change it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Always returns the same page
    struct StaticFetcher(Page);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Page, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn page_with_links(count: usize) -> Page {
        Page {
            title: "Many links".to_string(),
            links: (0..count).map(|i| format!("https://example.com/{}", i)).collect(),
        }
    }

    #[tokio::test]
    async fn test_under_the_cap_keeps_everything() {
        let counter = Arc::new(CrawlCounter::new());
        let fetcher = LimitedFetcher::new(StaticFetcher(page_with_links(3)), counter.clone(), 10);

        let page = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(page.links.len(), 3);
        assert_eq!(counter.current(), 3);
    }

    #[tokio::test]
    async fn test_page_never_accepts_more_than_the_cap() {
        let counter = Arc::new(CrawlCounter::new());
        let fetcher = LimitedFetcher::new(StaticFetcher(page_with_links(20)), counter, 5);

        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        match err {
            FetchError::CapExceeded { max, partial } => {
                assert_eq!(max, 5);
                assert_eq!(partial.title, "Many links");
                assert_eq!(partial.links.len(), 5);
                assert_eq!(partial.links[0], "https://example.com/0");
            }
            other => panic!("expected CapExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_page_bound_holds_when_counter_moves_backwards() {
        let counter = Arc::new(CrawlCounter::new());
        let fetcher = LimitedFetcher::new(StaticFetcher(Page::default()), counter.clone(), 3);
        let mut accepted = Vec::new();

        for i in 0..3 {
            assert!(fetcher.admit(&mut accepted, format!("https://example.com/{}", i)));
        }

        // Another page stores a stale value over ours mid-scan
        counter.rewind_to(1);

        assert!(!fetcher.admit(&mut accepted, "https://example.com/3".to_string()));
        assert_eq!(accepted.len(), 3);
    }

    #[tokio::test]
    async fn test_files_are_dropped_and_not_counted() {
        let counter = Arc::new(CrawlCounter::new());
        let inner = StaticFetcher(Page {
            title: String::new(),
            links: vec![
                "https://example.com/paper.pdf".to_string(),
                "https://example.com/next".to_string(),
                "https://example.com/logo.png".to_string(),
            ],
        });
        let fetcher = LimitedFetcher::new(inner, counter.clone(), 10);

        let page = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(page.links, vec!["https://example.com/next"]);
        assert_eq!(counter.current(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_cap_skips_download() {
        let counter = Arc::new(CrawlCounter::new());
        for _ in 0..3 {
            counter.increment_and_check(2);
        }
        let fetcher = LimitedFetcher::new(StaticFetcher(page_with_links(1)), counter, 2);

        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        assert_eq!(err.into_partial(), Some(Page::default()));
    }
}

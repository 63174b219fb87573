// src/fetch/html.rs
// =============================================================================
// This module turns downloaded HTML into a `Page`: its title and its links.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative URLs to absolute URLs
//
// Note: scraper's `Html` type cannot be sent between threads, so parsing is
// a plain (non-async) function. The async fetcher downloads first, then
// calls in here, and never holds an `Html` across an .await.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::{FetchError, Page};

// Extracts the title and all http(s) links from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: the Page, or FetchError::Parse if base_url is not a valid URL
//
// Example:
//   html = "<title>Docs</title><a href='/guide'>Guide</a>"
//   base_url = "https://example.com"
//   result = Page { title: "Docs", links: ["https://example.com/guide"] }
pub fn extract_page(html: &str, base_url: &str) -> Result<Page, FetchError> {
    let base = Url::parse(base_url)
        .map_err(|e| FetchError::Parse(format!("invalid base URL '{}': {}", base_url, e)))?;

    let document = Html::parse_document(html);

    let title_selector = parse_selector("title")?;
    let link_selector = parse_selector("a[href]")?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let links = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(&base, href))
        .filter(|url| is_crawlable_link(url))
        .collect();

    Ok(Page { title, links })
}

fn parse_selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("bad selector '{}': {}", css, e)))
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "#top" -> None (same page)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Url::join handles both absolute and relative hrefs
    base.join(href).ok().map(|url| url.to_string())
}

// Only http and https links can be crawled. This drops mailto:, tel:,
// javascript:, data: and friends.
fn is_crawlable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does Url::join do?
//    - It resolves a link the way a browser does
//    - "https://example.com/page/" + "../about" = "https://example.com/about"
//    - An absolute href simply replaces the base
//
// 2. Why filter_map?
//    - It maps and drops None values in one step
//    - Links without an href, or that fail to resolve, just disappear
//
// 3. Why return Result instead of unwrap() on the selectors?
//    - The selectors are constants, so parsing them never fails in practice
//    - Returning FetchError::Parse keeps the crawler free of panics anyway
// -----------------------------------------------------------------------------

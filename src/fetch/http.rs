// src/fetch/http.rs
// =============================================================================
// The real fetcher: downloads a page over HTTP and parses it.
//
// Key functionality:
// - One shared reqwest Client for every request (connection pooling)
// - A per-request timeout so one slow server cannot stall a whole branch
// - Non-2xx responses become FetchError::Status
// - Responses that are not HTML are dropped before the body is downloaded
//
// There is no retry here on purpose. A page that fails once is just a leaf.
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: For error handling with our FetchError enum
// - Traits: HttpFetcher implements the Fetcher trait
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::{extract_page, FetchError, Fetcher, Page};

/// Knobs for the HTTP client.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// How long a single request may take before it is abandoned
    pub timeout: Duration,
    /// Sent as the User-Agent header
    pub user_agent: String,
    /// How many redirects to follow before giving up
    pub redirect_limit: usize,
    /// Content types worth downloading. Anything else is skipped before
    /// the body is read.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("link-crawler/{}", env!("CARGO_PKG_VERSION")),
            redirect_limit: 5,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Fetches pages with reqwest and extracts their title and links.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    allowed_content_types: Vec<String>,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()?;

        Ok(Self {
            client,
            allowed_content_types: settings.allowed_content_types.clone(),
        })
    }

    // A response without a Content-Type header gets the benefit of the
    // doubt. Parameters such as "; charset=utf-8" are ignored.
    fn is_allowed(&self, content_type: Option<&str>) -> bool {
        let Some(content_type) = content_type else {
            return true;
        };
        let mime = content_type.split(';').next().unwrap_or("").trim();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await.map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Links to binaries often have no telling suffix (/download?id=1),
        // so the header is checked before any of the body is read
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        if !self.is_allowed(content_type) {
            return Err(FetchError::NotHtml(content_type.unwrap_or_default().to_string()));
        }

        // Resolve relative links against where we ended up, not where we
        // started, in case the request was redirected
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(FetchError::Body)?;
        debug!(url, bytes = body.len(), "downloaded page");

        extract_page(&body, &final_url)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why check Content-Type before reading the body?
//    - send() returns as soon as the headers arrive
//    - The body is only downloaded when we call text()
//    - Returning early means a large image or archive is never downloaded
//
// 2. Why map_err(FetchError::Request)?
//    - A tuple enum variant is also a function: reqwest::Error -> FetchError
//    - So it can be passed to map_err directly, no closure needed
// -----------------------------------------------------------------------------

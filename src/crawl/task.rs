// src/crawl/task.rs
// =============================================================================
// This module implements the concurrent, depth-limited crawl.
//
// How it works:
// 1. `crawl` marks the start URL as visited and spawns the root task
// 2. A task with depth 0 stops right away, without fetching anything
// 3. Otherwise it fetches its page (a failed fetch makes it a leaf)
// 4. It claims all of the page's links in the visited set in one go
// 5. It spawns one child task (depth - 1) for every link it won
// 6. It waits for every child to finish, then finishes itself
//
// Because of step 6, the root task only finishes after the whole tree below
// it has finished, so when `crawl` returns nothing is still running.
//
// Rust concepts:
// - tokio::spawn / JoinSet: Run child tasks concurrently and wait for all
// - Arc: Share one crawl state between all tasks
// - BoxFuture: A recursive async function needs its future boxed
// =============================================================================

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::VisitedSet;
use crate::fetch::{is_file_link, Fetcher, Page};

/// Settings for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// How many link hops from the start URL to fetch (0 = fetch nothing)
    pub depth: usize,
    /// Maximum number of fetches in flight at once (None = no limit)
    pub concurrency: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self { depth: 2, concurrency: None }
    }
}

/// What a finished crawl found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub depth: usize,
    /// Every page that was fetched, keyed by URL
    pub pages: BTreeMap<String, Page>,
    /// How many times the fetcher was called
    pub fetch_attempts: usize,
    /// How many of those calls failed
    pub fetch_failures: usize,
}

impl CrawlReport {
    /// Total number of links listed across all pages
    pub fn link_count(&self) -> usize {
        self.pages.values().map(|page| page.links.len()).sum()
    }

    /// Number of distinct links listed across all pages
    pub fn unique_link_count(&self) -> usize {
        self.pages
            .values()
            .flat_map(|page| page.links.iter())
            .collect::<HashSet<_>>()
            .len()
    }
}

// State shared by every task of one crawl
struct CrawlState<F> {
    fetcher: F,
    visited: VisitedSet,
    pages: Mutex<BTreeMap<String, Page>>,
    limiter: Option<Semaphore>,
    fetch_attempts: AtomicUsize,
    fetch_failures: AtomicUsize,
}

impl<F: Fetcher> CrawlState<F> {
    // Fetches a page and records it for the report.
    // Returns None when the page should not be expanded.
    async fn fetch(&self, url: &str) -> Option<Page> {
        // The permit only covers the fetch. Holding it while waiting for
        // children could use up every permit and deadlock the crawl.
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        self.fetch_attempts.fetch_add(1, Ordering::Relaxed);
        match self.fetcher.fetch(url).await {
            Ok(page) => {
                info!(url, title = %page.title, links = page.links.len(), "crawled page");
                self.record(url, page.clone());
                Some(page)
            }
            Err(err) => {
                self.fetch_failures.fetch_add(1, Ordering::Relaxed);
                debug!(url, error = %err, "fetch failed, not expanding");
                // A page cut short by the URL cap still shows up in the
                // report with the links read so far
                if let Some(partial) = err.into_partial() {
                    self.record(url, partial);
                }
                None
            }
        }
    }

    fn record(&self, url: &str, page: Page) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), page);
    }
}

// One crawl task. Returns once this page and everything below it is done.
fn crawl_task<F>(state: Arc<CrawlState<F>>, url: String, depth: usize) -> BoxFuture<'static, ()>
where
    F: Fetcher + 'static,
{
    async move {
        if depth == 0 {
            return;
        }

        let Some(page) = state.fetch(&url).await else {
            return;
        };

        // Claim all candidate links under one lock, so no other task can
        // slip in between our check and our insert
        let candidates = page.links.iter().filter(|link| !is_file_link(link));
        let children = state.visited.claim_new(candidates);
        debug!(url = %url, children = children.len(), "spawning child tasks");

        let mut tasks = JoinSet::new();
        for child in children {
            tasks.spawn(crawl_task(Arc::clone(&state), child, depth - 1));
        }

        // Fan-in: every child counts as done, including one that panicked
        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                warn!(parent = %url, error = %err, "crawl task did not finish cleanly");
            }
        }
    }
    .boxed()
}

/// Crawls from `start_url`, following links up to `config.depth` hops.
///
/// Returns once every task spawned along the way has finished. Fetch
/// failures never surface here: they only make the crawl smaller.
pub async fn crawl<F>(start_url: &str, fetcher: F, config: &CrawlConfig) -> CrawlReport
where
    F: Fetcher + 'static,
{
    let state = Arc::new(CrawlState {
        fetcher,
        visited: VisitedSet::new(),
        pages: Mutex::new(BTreeMap::new()),
        limiter: config.concurrency.map(|permits| Semaphore::new(permits.max(1))),
        fetch_attempts: AtomicUsize::new(0),
        fetch_failures: AtomicUsize::new(0),
    });
    state.visited.seed(start_url);

    let root = tokio::spawn(crawl_task(Arc::clone(&state), start_url.to_string(), config.depth));
    if let Err(err) = root.await {
        warn!(url = start_url, error = %err, "root crawl task did not finish cleanly");
    }

    let pages = std::mem::take(&mut *state.pages.lock().unwrap_or_else(PoisonError::into_inner));

    CrawlReport {
        start_url: start_url.to_string(),
        depth: config.depth,
        pages,
        fetch_attempts: state.fetch_attempts.load(Ordering::Relaxed),
        fetch_failures: state.fetch_failures.load(Ordering::Relaxed),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is crawl_task not an `async fn`?
//    - An async fn that calls itself would have a future that contains
//      itself, which has infinite size
//    - Returning BoxFuture puts each level's future on the heap, so the
//      size is known (one pointer)
//    - .boxed() comes from futures::FutureExt
//
// 2. What is a JoinSet?
//    - A collection of spawned tokio tasks
//    - join_next() waits for whichever task finishes first
//    - Looping until it returns None waits for all of them
//
// 3. Why does the mutex guard never cross an .await?
//    - claim_new() locks, works, and unlocks before returning
//    - Holding a std Mutex across .await would block a runtime thread and
//      make the future !Send, so tokio::spawn would refuse it
//
// 4. Why 'static on F?
//    - tokio::spawn can run a task after the caller's stack frame is gone
//    - So everything the task owns (including the fetcher) must not borrow
//      from the caller
// -----------------------------------------------------------------------------

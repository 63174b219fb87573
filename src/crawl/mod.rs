// src/crawl/mod.rs
// =============================================================================
// This module handles crawling: visiting a start page, then every page it
// links to, and so on, up to a fixed depth.
//
// Features:
// - Every newly found page is crawled in its own tokio task, concurrently
// - A shared visited set guarantees no page is fetched twice
// - A parent task only finishes after all of its children have finished,
//   so `crawl` returns exactly when the whole crawl is done
// - A soft global cap on the number of links accepted (see counter.rs)
//
// Submodules:
// - task: The recursive crawl task and the top-level `crawl` function
// - visited: The lock-protected set of claimed URLs
// - counter: The best-effort global link counter
// =============================================================================

mod counter;
mod task;
mod visited;

pub use counter::CrawlCounter;
pub use task::{crawl, CrawlConfig, CrawlReport};
pub use visited::{VisitedGuard, VisitedSet};

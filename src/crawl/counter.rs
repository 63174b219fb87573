// src/crawl/counter.rs
// =============================================================================
// The global crawl counter: how many links have been accepted so far, across
// every page being crawled at the same time.
//
// This counter is deliberately *soft*. Reading the value and writing the new
// one are two separate steps, so two tasks racing on it can both read 41 and
// both write 42. The effect is that a crawl can go a little past --max-urls.
// The only hard guarantee is per page (see fetch/limit.rs).
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Best-effort count of links accepted during one crawl.
#[derive(Debug, Default)]
pub struct CrawlCounter {
    count: AtomicUsize,
}

impl CrawlCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more link and reports whether `max` is now exceeded.
    ///
    /// Load and store are not one atomic step, so concurrent callers may
    /// lose increments. That is accepted: it only lets the crawl overshoot.
    pub fn increment_and_check(&self, max: usize) -> bool {
        let next = self.count.load(Ordering::Relaxed) + 1;
        self.count.store(next, Ordering::Relaxed);
        next > max
    }

    /// The current count
    pub fn current(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    // Stands in for another task's stale store landing on top of ours
    #[cfg(test)]
    pub(crate) fn rewind_to(&self, value: usize) {
        self.count.store(value, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(CrawlCounter::new().current(), 0);
    }

    #[test]
    fn test_exceeded_only_past_max() {
        let counter = CrawlCounter::new();
        assert!(!counter.increment_and_check(2));
        assert!(!counter.increment_and_check(2));
        assert!(counter.increment_and_check(2));
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_zero_max_is_exceeded_immediately() {
        let counter = CrawlCounter::new();
        assert!(counter.increment_and_check(0));
    }
}

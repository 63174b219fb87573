// src/crawl/visited.rs
// =============================================================================
// The visited set: which URLs have already been claimed by some crawl task.
//
// Every task of one crawl shares a single VisitedSet. The rule that keeps
// the crawl from fetching a page twice is simple: checking whether a URL is
// new and marking it as seen must happen while holding the lock, as one
// step. Two tasks that both find a link to /about will race for the lock,
// and only the first one sees it as new.
//
// The lock is a std::sync::Mutex. Its guard unlocks when dropped, so every
// way out of a locked section (return, `?`, panic) releases it. If a task
// panics while holding the lock the mutex is marked poisoned; we keep using
// the data anyway, since a HashSet of strings cannot be left half-updated
// by any operation we perform on it.
//
// Rust concepts:
// - MutexGuard: A value that represents "I hold the lock"
// - Drop: Code that runs automatically when a value goes out of scope
// - Poisoning: std's way of flagging that a lock holder panicked
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared record of the URLs claimed for fetching in one crawl.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

/// Exclusive access to the visited set. Dropping it releases the lock.
pub struct VisitedGuard<'a> {
    seen: MutexGuard<'a, HashSet<String>>,
}

impl VisitedGuard<'_> {
    /// Marks `url` as seen. Returns true if nobody had claimed it before.
    pub fn claim(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string())
    }
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until no other task holds the set, then hands it over.
    ///
    /// Keep the returned guard for as short as possible, and never across
    /// an .await.
    pub fn acquire(&self) -> VisitedGuard<'_> {
        let seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        VisitedGuard { seen }
    }

    /// Marks the start URL before any task runs
    pub fn seed(&self, url: &str) {
        self.acquire().claim(url);
    }

    /// Claims every URL in `urls` under a single lock.
    ///
    /// Returns the URLs that were new, in the order given. Duplicates
    /// inside `urls` are only returned once.
    pub fn claim_new<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.acquire();
        let mut new = Vec::new();
        for url in urls {
            let url = url.as_ref();
            if guard.claim(url) {
                new.push(url.to_string());
            }
        }
        new
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why std::sync::Mutex and not tokio::sync::Mutex?
//    - We never hold the lock across an .await
//    - For short, synchronous critical sections std's Mutex is simpler
//      and faster
//
// 2. What does unwrap_or_else(PoisonError::into_inner) do?
//    - lock() returns Err if a previous holder panicked
//    - into_inner() hands us the guard anyway, so one crashed task cannot
//      stop the rest of the crawl
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_claim_new_returns_only_unseen() {
        let visited = VisitedSet::new();
        visited.seed("https://a.com");

        let new = visited.claim_new(["https://a.com", "https://b.com", "https://c.com"]);
        assert_eq!(new, vec!["https://b.com", "https://c.com"]);

        let again = visited.claim_new(["https://b.com", "https://d.com"]);
        assert_eq!(again, vec!["https://d.com"]);

        let all = ["https://a.com", "https://b.com", "https://c.com", "https://d.com"];
        assert!(visited.claim_new(all).is_empty());
    }

    #[test]
    fn test_duplicates_in_one_batch() {
        let visited = VisitedSet::new();
        let new = visited.claim_new(vec!["https://x.com".to_string(), "https://x.com".to_string()]);
        assert_eq!(new, vec!["https://x.com"]);
    }

    #[test]
    fn test_only_one_thread_wins_a_url() {
        let visited = Arc::new(VisitedSet::new());
        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let visited = Arc::clone(&visited);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    visited.claim_new(["https://shared.com/page"]).len()
                })
            })
            .collect();

        let winners: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_panic_while_holding_does_not_lock_others_out() {
        let visited = Arc::new(VisitedSet::new());

        let cloned = Arc::clone(&visited);
        let result = thread::spawn(move || {
            let mut guard = cloned.acquire();
            guard.claim("https://before-panic.com");
            panic!("task blew up while holding the visited set");
        })
        .join();
        assert!(result.is_err());

        // The lock was released on unwind, and the data is still usable
        assert!(visited.claim_new(["https://before-panic.com"]).is_empty());
        assert_eq!(visited.claim_new(["https://after.com"]), vec!["https://after.com"]);
    }
}

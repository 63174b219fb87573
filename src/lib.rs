// src/lib.rs
// =============================================================================
// The library half of link-crawler.
//
// main.rs is a thin shell around these modules: it parses flags, sets up
// logging, and prints the report. Everything that does real work lives here
// so it can be tested without a terminal or a network.
//
// Modules:
// - cli: Command-line flags and their defaults
// - crawl: The concurrent, depth-limited crawl (tasks, visited set, counter)
// - fetch: Fetching one page (HTTP, HTML parsing, file filter, URL cap)
// =============================================================================

pub mod cli;
pub mod crawl;
pub mod fetch;

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag has a default, so running `link-crawler` with no arguments
// crawls the default start page two levels deep.
// =============================================================================

use clap::Parser;

use crate::crawl::CrawlConfig;
use crate::fetch::FetchSettings;

/// Where the crawl starts when --url is not given
pub const DEFAULT_START_URL: &str = "http://www.marcvanzee.nl";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a website concurrently and list every page and link found",
    long_about = "link-crawler starts at one URL, fetches it, and then fetches every page it \
                  links to in parallel, up to a fixed depth. Each page is fetched at most once. \
                  It prints every crawled page with its title and outgoing links."
)]
pub struct Cli {
    /// The URL to start crawling from
    #[arg(long, default_value = DEFAULT_START_URL)]
    pub url: String,

    /// How many link hops from the start URL to crawl
    ///
    /// Depth 0 = fetch nothing
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Stop accepting new links once this many have been found
    ///
    /// This is a soft limit: pages crawled in parallel may push the total a
    /// little past it, but no single page contributes more than this.
    #[arg(long = "max-urls", alias = "max_urls", default_value_t = 150)]
    pub max_urls: usize,

    /// Maximum number of pages downloaded at the same time (default: no limit)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Output the report in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// Log every fetch and failure to stderr (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            depth: self.depth,
            concurrency: self.concurrency,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: std::time::Duration::from_secs(self.timeout),
            ..FetchSettings::default()
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does alias = "max_urls" do?
//    - clap accepts --max_urls as another spelling of --max-urls
//    - Only --max-urls is shown in --help
//
// 2. What is ..FetchSettings::default()?
//    - Struct update syntax: take the fields we did not list from another
//      value of the same type
// -----------------------------------------------------------------------------

// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Crawl from the start URL
// 4. Print the crawl report (text or JSON) on stdout
// 5. Exit with proper code (0 = crawl finished, 2 = could not start)
//
// A crawl that finds fewer pages than expected is not an error. Pages that
// fail to load are simply left out of the report.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

// The crawling logic lives in the library half of this crate (src/lib.rs)
use link_crawler::cli::Cli;
use link_crawler::crawl::{self, CrawlCounter, CrawlReport};
use link_crawler::fetch::{HttpFetcher, LimitedFetcher};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the report on stdout.
// RUST_LOG wins over --verbose when it is set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let start = Url::parse(&cli.url).with_context(|| format!("invalid start URL '{}'", cli.url))?;

    info!(
        url = %start,
        depth = cli.depth,
        max_urls = cli.max_urls,
        concurrency = ?cli.concurrency,
        "starting crawl"
    );

    let http = HttpFetcher::new(&cli.fetch_settings()).context("failed to create HTTP client")?;
    let counter = Arc::new(CrawlCounter::new());
    let fetcher = LimitedFetcher::new(http, Arc::clone(&counter), cli.max_urls);

    // Url::parse normalizes the URL ("http://a.com" -> "http://a.com/"),
    // which is also how links found on pages are written
    let report = crawl::crawl(start.as_str(), fetcher, &cli.crawl_config()).await;

    info!(
        pages = report.pages.len(),
        links_accepted = counter.current(),
        failures = report.fetch_failures,
        "finished crawl"
    );

    print_report(&report, cli.json)
}

// Prints the report either as text or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print!("{}", format_report(report));
    }
    Ok(())
}

// Renders the human-readable report
//
// Layout:
//   Start URL: http://example.com/ (Home)
//
//   http://example.com/ (Home)
//   |-- http://example.com/about
//
//   Crawled 1 page(s), listed 1 link(s), 1 unique
fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Start URL: {}", report.start_url));
    if let Some(page) = report.pages.get(&report.start_url) {
        out.push_str(&format!(" ({})", page.title));
    }
    out.push_str("\n\n");

    for (url, page) in &report.pages {
        out.push_str(&format!("{} ({})\n", url, page.title));
        for link in &page.links {
            out.push_str(&format!("|-- {}\n", link));
        }
    }

    out.push_str(&format!(
        "\nCrawled {} page(s), listed {} link(s), {} unique\n",
        report.pages.len(),
        report.link_count(),
        report.unique_link_count()
    ));
    if report.fetch_failures > 0 {
        out.push_str(&format!(
            "{} of {} fetch(es) failed or were cut short\n",
            report.fetch_failures, report.fetch_attempts
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use link_crawler::fetch::Page;

    fn sample_report() -> CrawlReport {
        let mut report = CrawlReport {
            start_url: "https://a.com/".to_string(),
            depth: 2,
            fetch_attempts: 3,
            fetch_failures: 1,
            ..CrawlReport::default()
        };
        report.pages.insert(
            "https://a.com/".to_string(),
            Page {
                title: "A".to_string(),
                links: vec!["https://a.com/b".to_string(), "https://a.com/c".to_string()],
            },
        );
        report.pages.insert(
            "https://a.com/b".to_string(),
            Page { title: "B".to_string(), links: vec!["https://a.com/c".to_string()] },
        );
        report
    }

    #[test]
    fn test_text_report_lists_pages_and_links() {
        let text = format_report(&sample_report());

        assert!(text.starts_with("Start URL: https://a.com/ (A)\n"));
        assert!(text.contains("https://a.com/b (B)\n|-- https://a.com/c\n"));
        assert!(text.contains("Crawled 2 page(s), listed 3 link(s), 2 unique"));
        assert!(text.contains("1 of 3 fetch(es) failed"));
    }

    #[test]
    fn test_text_report_without_start_page() {
        let report = CrawlReport { start_url: "https://down.com/".to_string(), ..CrawlReport::default() };
        let text = format_report(&report);

        assert!(text.starts_with("Start URL: https://down.com/\n"));
        assert!(text.contains("Crawled 0 page(s)"));
        assert!(!text.contains("failed"));
    }

    #[test]
    fn test_json_report_shape() {
        let value = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(value["start_url"], "https://a.com/");
        assert_eq!(value["pages"]["https://a.com/b"]["title"], "B");
        assert_eq!(value["pages"]["https://a.com/"]["links"].as_array().unwrap().len(), 2);
    }
}

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   web-crawler [OPTIONS] <URLS>...
//
// Every URL given is crawled separately with the same options.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Doc comments (///) on fields become the --help text
// =============================================================================

use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Parser;

use web_crawler::config::{
    CrawlConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};

#[derive(Parser, Debug)]
#[command(
    name = "web-crawler",
    version,
    about = "Crawls the given URLs and prints every page found",
    long_about = "web-crawler starts at each URL, follows the links it finds and prints every \
                  page it visited, one per line. By default only links on the same host as \
                  the starting URL are followed."
)]
pub struct Cli {
    /// URLs to start crawling from
    ///
    /// "example.com" is treated as "http://example.com"
    pub urls: Vec<String>,

    /// Also follow links to other domains
    #[arg(short = 'c', long = "crossdomain")]
    pub cross_domain: bool,

    /// Maximum link depth to crawl (0 = no limit)
    ///
    /// Depth 1 = the starting page and the pages it links to
    #[arg(short = 'l', long, default_value_t = 0)]
    pub depth: usize,

    /// Number of pages fetched at the same time
    #[arg(short, long, default_value_t = DEFAULT_WORKERS,
          value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Print each crawl result as JSON instead of one URL per line
    #[arg(long)]
    pub json: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_workers: self.workers,
            max_depth: self.depth,
            cross_domain: self.cross_domain,
            request_timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            ..CrawlConfig::default()
        }
    }
}

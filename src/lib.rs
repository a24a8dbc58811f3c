// src/lib.rs
// =============================================================================
// web-crawler: lists every page reachable from a seed URL.
//
// The binary (src/main.rs) is a thin CLI around this library:
//
//   let crawler = Crawler::new(CrawlConfig::default())?;
//   let report = crawler.run("https://example.com/").await?;
//   for url in &report.visited { println!("{}", url); }
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod logging;

pub use config::CrawlConfig;
pub use crawl::{CrawlReport, Crawler};
pub use error::CrawlError;

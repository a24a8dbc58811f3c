// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Submodules, leaves first:
// - fetcher:     HTTP requests (trait + reqwest implementation)
// - extract:     raw href values from HTML (trait + scraper implementation)
// - normalize:   href -> absolute URL, and the same-domain policy
// - frontier:    pending / visited URL sets, at-most-once dispatch
// - worker:      what happens to one URL
// - pool:        bounded set of concurrent workers
// - coordinator: runs a crawl until nothing is left to do
// =============================================================================

mod coordinator;
mod extract;
mod fetcher;
mod frontier;
mod normalize;
mod pool;
mod worker;

#[cfg(test)]
mod testing;

pub use coordinator::{parse_seed, CrawlReport, CrawlState, Crawler, PageFailure};
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetcher::{FetchResponse, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use normalize::{normalize_href, validate_link, LinkPolicy};
pub use pool::WorkerPool;
pub use worker::{CrawlTask, PageProcessor, TaskResult};

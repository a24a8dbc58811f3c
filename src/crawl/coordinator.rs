// src/crawl/coordinator.rs
// =============================================================================
// Drives one crawl from a seed URL to completion.
//
// The crawl moves through three states:
//
//   SEEDING  -> put the seed URL into the frontier
//   DRAINING -> loop:
//                 1. hand pending URLs to free worker slots
//                 2. stop if nothing is pending AND nothing is in flight
//                 3. wait (bounded) for finished tasks and enqueue what
//                    they discovered
//   DONE     -> report every visited URL in dispatch order
//
// Step 2 runs on every iteration, after dispatching and before waiting. An
// empty frontier alone is not enough to stop: a task still in flight may
// discover new pages.
//
// Only the coordinator touches the frontier during a crawl, but the frontier
// is safe to share regardless.
// =============================================================================

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::CrawlConfig;
use crate::crawl::extract::{HtmlLinkExtractor, LinkExtractor};
use crate::crawl::fetcher::{Fetcher, HttpFetcher};
use crate::crawl::frontier::Frontier;
use crate::crawl::normalize::LinkPolicy;
use crate::crawl::pool::WorkerPool;
use crate::crawl::worker::{CrawlTask, PageProcessor, TaskResult};
use crate::error::CrawlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Seeding,
    Draining,
    Done,
}

// A page that was visited but contributed no links because it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub reason: String,
}

// The outcome of one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// The seed as it was actually crawled (after normalization)
    pub seed: String,
    /// Every dispatched URL, in dispatch order
    pub visited: Vec<String>,
    /// Visited pages that failed to fetch or returned an error status
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PageFailure>,
    /// True if the crawl was stopped before it ran out of work
    pub cancelled: bool,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP and parses HTML.
    ///
    /// Each Crawler owns one HTTP session (and cookie jar).
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_collaborators(config, Arc::new(fetcher), Arc::new(HtmlLinkExtractor))
    }

    /// Creates a crawler around any fetcher and extractor.
    pub fn with_collaborators(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            extractor,
        })
    }

    /// Crawls everything reachable from `seed` until the site is exhausted.
    pub async fn run(&self, seed: &str) -> Result<CrawlReport, CrawlError> {
        self.run_until_cancelled(seed, CancellationToken::new()).await
    }

    /// Like `run`, but stops early once `cancel` fires.
    ///
    /// A cancelled crawl still returns the URLs dispatched so far.
    pub async fn run_until_cancelled(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let mut state = CrawlState::Seeding;
        tracing::debug!(?state, seed, "starting crawl");

        let seed_url = parse_seed(seed)?;
        let policy = LinkPolicy::from_seed(&seed_url, self.config.cross_domain)?;
        let processor = PageProcessor::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.extractor),
            policy,
        );

        let frontier = Frontier::new(self.config.max_depth);
        let mut pool = WorkerPool::new(self.config.max_workers, processor);
        let mut failures = Vec::new();
        let mut cancelled = false;

        frontier.try_enqueue(seed_url.as_str(), 0);

        state = CrawlState::Draining;
        tracing::debug!(
            ?state,
            workers = self.config.max_workers,
            "crawling {}",
            seed_url
        );

        loop {
            if cancel.is_cancelled() {
                tracing::info!(
                    in_flight = pool.in_flight(),
                    "crawl of {} cancelled",
                    seed_url
                );
                pool.shutdown().await;
                cancelled = true;
                break;
            }

            while pool.has_free_slot() {
                // With a depth limit, depth d + 1 waits until depth d is done
                let ceiling = if frontier.is_breadth_first() {
                    pool.shallowest_in_flight()
                } else {
                    None
                };
                match frontier.try_dequeue_up_to(ceiling) {
                    Some(entry) => {
                        tracing::debug!(depth = entry.depth, "dispatching {}", entry.url);
                        pool.dispatch(CrawlTask {
                            url: entry.url,
                            depth: entry.depth,
                        });
                    }
                    None => break,
                }
            }

            if frontier.is_empty() && pool.is_idle() {
                break;
            }

            for result in pool.collect_finished(self.config.poll_interval).await {
                absorb(&frontier, result, &mut failures);
            }

            tracing::trace!(
                visited = frontier.visited_count(),
                pending = frontier.pending_count(),
                in_flight = pool.in_flight(),
                "crawl progress"
            );
        }

        state = CrawlState::Done;
        let visited = frontier.visited();
        tracing::debug!(?state, "crawled through {} items", visited.len());

        Ok(CrawlReport {
            seed: seed_url.to_string(),
            visited,
            failures,
            cancelled,
        })
    }
}

// Feeds a finished task back into the frontier
fn absorb(frontier: &Frontier, result: TaskResult, failures: &mut Vec<PageFailure>) {
    match result.error {
        Some(error) if error.is_page_local() => failures.push(PageFailure {
            url: result.url.clone(),
            reason: error.to_string(),
        }),
        Some(error) => tracing::warn!("unexpected error from {}: {}", result.url, error),
        None => {}
    }

    let next_depth = result.depth + 1;
    let mut added = 0;
    for url in &result.discovered {
        if frontier.try_enqueue(url, next_depth) {
            tracing::trace!("pushed {} to the frontier", url);
            added += 1;
        }
    }

    tracing::debug!(
        "{} finished with {} new of {} discovered URL(s)",
        result.url,
        added,
        result.discovered.len()
    );
}

// Parses the seed, retrying with "http://" for bare hosts like "example.com"
// or "example.com:8080/x" (which the URL parser reads as scheme "example.com")
pub fn parse_seed(seed: &str) -> Result<Url, CrawlError> {
    let has_http_prefix = seed.starts_with("http://") || seed.starts_with("https://");
    let invalid = |reason: String| {
        CrawlError::Config(format!("invalid seed URL '{}': {}", seed, reason))
    };

    let url = match Url::parse(seed) {
        Ok(url) if url.host_str().is_some() || has_http_prefix => url,
        Ok(url) if !looks_like_host_and_port(&url) => url,
        Err(e) if has_http_prefix => return Err(invalid(e.to_string())),
        _ => Url::parse(&format!("http://{}", seed)).map_err(|e| invalid(e.to_string()))?,
    };

    if url.host_str().is_none() {
        return Err(CrawlError::Config(format!(
            "seed URL has no host: {}",
            seed
        )));
    }

    Ok(url)
}

// "host:8080/path" parses with the host as the scheme and the port at the
// start of the path
fn looks_like_host_and_port(url: &Url) -> bool {
    url.path().starts_with(|c: char| c.is_ascii_digit())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Fetcher>?
//    - dyn Fetcher means "some type that implements Fetcher", picked at runtime
//    - Arc lets every spawned task hold the same fetcher
//    - Tests pass an in-memory fake, the CLI passes HttpFetcher
//
// 2. What is a CancellationToken?
//    - A flag that can be set from anywhere (e.g. a Ctrl-C handler)
//    - Clones share the same flag
//    - The loop checks it once per iteration
//
// 3. Why does `absorb` take `&mut Vec<PageFailure>`?
//    - It needs to append to a list the caller owns
//    - A mutable borrow lets it do so without taking ownership
// -----------------------------------------------------------------------------

// src/config.rs
// =============================================================================
// Settings for a single crawl.
//
// The CLI builds one of these from its flags (see main.rs); tests build them
// directly with struct update syntax:
//
//   CrawlConfig { max_workers: 1, ..CrawlConfig::default() }
// =============================================================================

use std::time::Duration;

use crate::error::CrawlError;

/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 20;

/// How long the coordinator waits for a finished task before re-checking
/// the exit condition
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Per-request timeout used by the HTTP fetcher
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = "WebCrawler";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum number of pages fetched at the same time
    pub max_workers: usize,
    /// Maximum link distance from the seed (0 = unlimited)
    pub max_depth: usize,
    /// Follow links whose host differs from the seed's host
    pub cross_domain: bool,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_WORKERS,
            max_depth: 0,
            cross_domain: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    // Rejects settings the engine cannot run with
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_workers == 0 {
            return Err(CrawlError::Config(
                "worker pool size must be at least 1".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(CrawlError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

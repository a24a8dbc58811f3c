// src/crawl/worker.rs
// =============================================================================
// What a worker does with one URL.
//
// 1. Fetch the page
// 2. Decide what the response contributes:
//    - transport failure    -> nothing (error recorded)
//    - 2xx                  -> every accepted link in the body
//    - 301 / 302            -> the Location target, as-is
//    - anything else        -> nothing (error recorded)
// 3. Return the result; the coordinator picks it up when the task finishes
//
// Redirect targets skip the link policy on purpose: a same-site page that
// redirects off-site will pull the off-site URL into the crawl. Changing
// that changes which URLs get visited.
// =============================================================================

use std::sync::Arc;

use crate::crawl::extract::LinkExtractor;
use crate::crawl::fetcher::{FetchResponse, Fetcher};
use crate::crawl::normalize::LinkPolicy;
use crate::error::CrawlError;

// A URL handed to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    /// Link distance from the seed
    pub depth: usize,
}

// What a finished task hands back to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub url: String,
    pub depth: usize,
    /// URLs found on the page (or the redirect target)
    pub discovered: Vec<String>,
    /// Why the page contributed nothing, if it failed
    pub error: Option<CrawlError>,
}

impl TaskResult {
    pub(crate) fn empty(task: &CrawlTask, error: Option<CrawlError>) -> Self {
        Self {
            url: task.url.clone(),
            depth: task.depth,
            discovered: Vec::new(),
            error,
        }
    }
}

// Everything a worker needs, shared by all tasks of one crawl
#[derive(Clone)]
pub struct PageProcessor {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    policy: Arc<LinkPolicy>,
}

impl PageProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        policy: LinkPolicy,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            policy: Arc::new(policy),
        }
    }

    /// Fetches one page and collects the URLs it leads to.
    pub async fn process(&self, task: CrawlTask) -> TaskResult {
        let response = match self.fetcher.fetch(&task.url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Error GETing {}: {}", task.url, e);
                return TaskResult::empty(&task, Some(e));
            }
        };

        tracing::debug!(url = %task.url, status = response.status, "fetched");

        if response.is_success() {
            let discovered = self.links_in(&response);
            tracing::debug!("{} returned {} link(s)", task.url, discovered.len());
            TaskResult {
                url: task.url,
                depth: task.depth,
                discovered,
                error: None,
            }
        } else if response.is_followed_redirect() {
            let discovered: Vec<String> = response.redirect_location.into_iter().collect();
            if let Some(target) = discovered.first() {
                tracing::debug!("redirection from {} to {}", task.url, target);
            }
            TaskResult {
                url: task.url,
                depth: task.depth,
                discovered,
                error: None,
            }
        } else {
            let error = CrawlError::Http {
                url: task.url.clone(),
                status: response.status,
            };
            tracing::debug!("{}", error);
            TaskResult::empty(&task, Some(error))
        }
    }

    fn links_in(&self, response: &FetchResponse) -> Vec<String> {
        let body = match &response.body {
            Some(body) => body,
            None => return Vec::new(),
        };

        self.extractor
            .extract_hrefs(body)
            .iter()
            .filter_map(|href| self.policy.accept(href))
            .collect()
    }
}

// src/crawl/testing.rs
// =============================================================================
// An in-memory website for engine tests. No network, no timing surprises.
//
//   FakeSite::new()
//       .page("http://example.com/", &["/a", "/b"])
//       .status("http://example.com/a", 404)
//
// URLs that were never registered answer 404.
// =============================================================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::crawl::fetcher::{FetchResponse, Fetcher};
use crate::error::CrawlError;

#[derive(Debug, Default)]
pub struct FakeSite {
    responses: HashMap<String, Option<FetchResponse>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    // A 200 page whose body links to each href
    pub fn page(self, url: &str, hrefs: &[&str]) -> Self {
        let body: String = hrefs
            .iter()
            .map(|href| format!("<a href=\"{}\">link</a>\n", href))
            .collect();
        self.response(
            url,
            FetchResponse {
                status: 200,
                body: Some(format!("<html><body>{}</body></html>", body)),
                redirect_location: None,
            },
        )
    }

    pub fn redirect(self, url: &str, status: u16, location: &str) -> Self {
        self.response(
            url,
            FetchResponse {
                status,
                body: Some(String::new()),
                redirect_location: Some(location.to_string()),
            },
        )
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.response(
            url,
            FetchResponse {
                status,
                body: Some(String::new()),
                redirect_location: None,
            },
        )
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), None);
        self
    }

    pub fn response(mut self, url: &str, response: FetchResponse) -> Self {
        self.responses.insert(url.to_string(), Some(response));
        self
    }

    // Every fetch sleeps this long first
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeSite {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CrawlError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(url) {
            Some(Some(response)) => Ok(response.clone()),
            Some(None) => Err(CrawlError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            None => Ok(FetchResponse {
                status: 404,
                body: Some(String::new()),
                redirect_location: None,
            }),
        }
    }
}

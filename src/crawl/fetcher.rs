// src/crawl/fetcher.rs
// =============================================================================
// Fetching pages over HTTP.
//
// The crawl engine only sees the `Fetcher` trait, so tests can swap in a fake
// that serves pages from memory. `HttpFetcher` is the real implementation:
//
// - redirects are NOT followed; 301/302 come back with their Location so the
//   crawler can treat the target as a new URL
// - one client per crawl, with its own cookie jar (cookies set by one page
//   are sent to the next, but never leak into another crawl)
// - any failure before a status line arrives is a Transport error
//
// Rust concepts:
// - Traits: an interface the engine is written against
// - async-trait: lets a trait have async methods and still be used as
//   `dyn Fetcher`
// =============================================================================

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};

use crate::config::CrawlConfig;
use crate::error::CrawlError;

// What a single GET produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, if one could be read as text
    pub body: Option<String>,
    /// Value of the Location header, if present
    pub redirect_location: Option<String>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_followed_redirect(&self) -> bool {
        self.status == 301 || self.status == 302
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs one GET request for `url`.
    ///
    /// Returns Err(CrawlError::Transport) if no response was received.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CrawlError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the client for one crawl session
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::none())
            .cookie_store(true)
            .build()
            .map_err(|e| CrawlError::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CrawlError> {
        let transport = |e: reqwest::Error| CrawlError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status().as_u16();
        let redirect_location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(transport)?;

        Ok(FetchResponse {
            status,
            body: Some(body),
            redirect_location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        let ok = FetchResponse {
            status: 204,
            ..FetchResponse::default()
        };
        assert!(ok.is_success());
        assert!(!ok.is_followed_redirect());

        let moved = FetchResponse {
            status: 301,
            ..FetchResponse::default()
        };
        assert!(moved.is_followed_redirect());

        // 303/307/308 are not followed
        let see_other = FetchResponse {
            status: 303,
            ..FetchResponse::default()
        };
        assert!(!see_other.is_success());
        assert!(!see_other.is_followed_redirect());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        // Port 9 (discard) on localhost is closed on test machines
        let result = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(CrawlError::Transport { .. })));
    }
}

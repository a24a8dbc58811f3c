// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Only `Config` ever stops a crawl. The other variants are scoped to a
// single page or a single href:
// - Transport: the request never produced a response (DNS, refused, timeout)
// - Http: the server answered with a status we don't follow
// - Parse: an href could not be turned into a crawlable URL
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// =============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    /// The fetch failed before any HTTP status was received
    #[error("failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a status that is neither 2xx nor 301/302
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// An href that is neither root-relative nor an absolute URL
    #[error("could not interpret link '{href}'")]
    Parse { href: String },

    /// Malformed seed URL or invalid crawl settings
    #[error("configuration error: {0}")]
    Config(String),
}

impl CrawlError {
    /// Errors that only affect one page (the crawl keeps going)
    pub fn is_page_local(&self) -> bool {
        matches!(self, CrawlError::Transport { .. } | CrawlError::Http { .. })
    }
}

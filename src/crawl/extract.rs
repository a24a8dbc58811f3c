// src/crawl/extract.rs
// =============================================================================
// Pulls raw href values out of HTML.
//
// The extractor does no URL handling at all: it returns the attribute values
// exactly as written. Turning them into absolute URLs is normalize.rs's job.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, forgiving broken markup like a browser would
// - Supports CSS selectors for finding elements
// =============================================================================

use scraper::{Html, Selector};

pub trait LinkExtractor: Send + Sync {
    /// Returns every anchor href in the document, in document order.
    ///
    /// Anything that cannot be parsed yields no links rather than an error.
    fn extract_hrefs(&self, html: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_hrefs(&self, html: &str) -> Vec<String> {
        // "a[href]" is a constant selector; a parse failure here would mean a
        // broken scraper build, and an empty link list is the safe outcome
        let selector = match Selector::parse("a[href]") {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };

        let document = Html::parse_document(html);

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

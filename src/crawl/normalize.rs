// src/crawl/normalize.rs
// =============================================================================
// Turns raw href values into crawlable URLs and decides whether a URL is
// inside the crawl policy.
//
// Normalization rules:
// 1. "/path"         -> "<scheme>://<host>/path"  (root-relative)
// 2. "scheme://..."  -> the parsed absolute URL as a string
// 3. anything else   -> rejected
//
// Rule 3 means links relative to the current page ("a/b", "../c") are NOT
// resolved. Callers rely on that, so don't switch this to Url::join.
//
// Validation rules:
// - the URL must parse
// - without cross-domain crawling, its host must equal the seed's host
//   exactly (no subdomain matching, so "www.example.com" != "example.com")
// =============================================================================

use url::Url;

use crate::error::CrawlError;

// The parts of the seed URL that link handling depends on
//
// authority: host plus explicit port ("127.0.0.1:8080"), used to build
//            root-relative links
// host:      bare host ("127.0.0.1"), used for the same-domain check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    pub scheme: String,
    pub authority: String,
    pub host: String,
    pub cross_domain: bool,
}

impl LinkPolicy {
    // Builds the policy from a parsed seed URL
    //
    // Returns: Err(CrawlError::Config) if the seed has no host
    //          (e.g. "mailto:someone@example.com")
    pub fn from_seed(seed: &Url, cross_domain: bool) -> Result<Self, CrawlError> {
        let host = seed
            .host_str()
            .ok_or_else(|| CrawlError::Config(format!("seed URL has no host: {}", seed)))?;

        let authority = match seed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: seed.scheme().to_string(),
            authority,
            host: host.to_string(),
            cross_domain,
        })
    }

    /// Normalizes and validates one href
    ///
    /// Returns the crawlable URL, or None if the link is dropped for any
    /// reason.
    pub fn accept(&self, href: &str) -> Option<String> {
        let link = match normalize_href(href, &self.authority, &self.scheme) {
            Ok(link) => link,
            Err(e) => {
                tracing::trace!("dropping href: {}", e);
                return None;
            }
        };

        if validate_link(&link, &self.host, self.cross_domain) {
            Some(link)
        } else {
            tracing::trace!("link outside crawl policy: {}", link);
            None
        }
    }
}

// Converts a raw href into an absolute URL string
//
// Parameters:
//   href:   the raw attribute value
//   host:   host (with port, if any) of the site being crawled
//   scheme: scheme to use for root-relative links
//
// Examples:
//   normalize_href("/a/b", "example.com", "http")      -> "http://example.com/a/b"
//   normalize_href("http://x.com/y", "example.com", _) -> "http://x.com/y"
//   normalize_href("a/b", "example.com", "http")       -> Err(Parse)
pub fn normalize_href(href: &str, host: &str, scheme: &str) -> Result<String, CrawlError> {
    if href.starts_with('/') {
        return Ok(format!("{}://{}{}", scheme, host, href));
    }

    match Url::parse(href) {
        Ok(url) => Ok(url.to_string()),
        Err(_) => Err(CrawlError::Parse {
            href: href.to_string(),
        }),
    }
}

// Checks whether a normalized URL may be enqueued
//
// Parameters:
//   link:         the normalized URL
//   base_host:    host of the seed URL (no port)
//   cross_domain: whether other hosts are allowed
pub fn validate_link(link: &str, base_host: &str, cross_domain: bool) -> bool {
    let parsed = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if !cross_domain && parsed.host_str() != Some(base_host) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(seed: &str, cross_domain: bool) -> LinkPolicy {
        LinkPolicy::from_seed(&Url::parse(seed).unwrap(), cross_domain).unwrap()
    }

    #[test]
    fn test_root_relative_href() {
        let link = normalize_href("/a/b", "example.com", "http").unwrap();
        assert_eq!(link, "http://example.com/a/b");
    }

    #[test]
    fn test_absolute_href_kept() {
        let link = normalize_href("http://x.com/y", "example.com", "http").unwrap();
        assert_eq!(link, "http://x.com/y");
    }

    #[test]
    fn test_absolute_href_gets_trailing_slash() {
        let link = normalize_href("https://x.com", "example.com", "http").unwrap();
        assert_eq!(link, "https://x.com/");
    }

    #[test]
    fn test_page_relative_href_rejected() {
        let result = normalize_href("a/b", "example.com", "http");
        assert_eq!(
            result,
            Err(CrawlError::Parse {
                href: "a/b".to_string()
            })
        );
        assert!(normalize_href("../up", "example.com", "http").is_err());
        assert!(normalize_href("#top", "example.com", "http").is_err());
    }

    #[test]
    fn test_query_and_fragment_preserved() {
        let link = normalize_href("/search?q=rust#results", "example.com", "https").unwrap();
        assert_eq!(link, "https://example.com/search?q=rust#results");
    }

    #[test]
    fn test_same_domain_only() {
        assert!(validate_link("http://example.com/x", "example.com", false));
        assert!(!validate_link("http://other.example/x", "example.com", false));
        assert!(!validate_link("http://www.example.com/x", "example.com", false));
    }

    #[test]
    fn test_cross_domain_allowed() {
        assert!(validate_link("http://other.example/x", "example.com", true));
    }

    #[test]
    fn test_unparseable_link_invalid() {
        assert!(!validate_link("", "example.com", true));
        assert!(!validate_link("not a url", "example.com", true));
    }

    #[test]
    fn test_policy_keeps_port_for_relative_links() {
        let policy = policy("http://127.0.0.1:8080/start", false);
        assert_eq!(policy.authority, "127.0.0.1:8080");
        assert_eq!(policy.host, "127.0.0.1");
        assert_eq!(
            policy.accept("/next"),
            Some("http://127.0.0.1:8080/next".to_string())
        );
    }

    #[test]
    fn test_policy_uses_seed_scheme() {
        let policy = policy("https://example.com/", false);
        assert_eq!(
            policy.accept("/secure"),
            Some("https://example.com/secure".to_string())
        );
    }

    #[test]
    fn test_policy_filters_other_hosts() {
        let same = policy("http://example.com/", false);
        assert_eq!(same.accept("http://other.example/x"), None);
        assert_eq!(same.accept("a/b"), None);

        let cross = policy("http://example.com/", true);
        assert_eq!(
            cross.accept("http://other.example/x"),
            Some("http://other.example/x".to_string())
        );
    }

    #[test]
    fn test_seed_without_host_rejected() {
        let seed = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            LinkPolicy::from_seed(&seed, false),
            Err(CrawlError::Config(_))
        ));
    }
}

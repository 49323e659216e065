//! Address bar input classification
//!
//! Two outcomes only: the text is something we can load, or it is a search.
//! Anything ambiguous leans toward search, so a typo never turns into a
//! connection error.

use std::net::IpAddr;
use url::form_urlencoded;
use url::Url;

/// What a piece of address bar text means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Absolute URL, ready to resolve and fetch.
    Url(String),
    /// Free text to hand to the search engine.
    SearchQuery(String),
}

/// Classify address bar input.
///
/// Schemed URLs pass through unchanged. Bare hostnames (`example.com/docs`,
/// `localhost:8080`, IP addresses) are completed with `https://`. Everything
/// else, including the empty string, is a search query.
pub fn classify(input: &str) -> Classification {
    let input = input.trim();

    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return Classification::SearchQuery(input.to_string());
    }

    // Fully qualified http(s) URL: pass through without re-normalization.
    let lowered = input.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        if Url::parse(input).is_ok() {
            return Classification::Url(input.to_string());
        }
        return Classification::SearchQuery(input.to_string());
    }

    // Non-network schemes the rendering surface understands directly.
    if lowered.starts_with("file://") || lowered.starts_with("about:") || lowered.starts_with("data:")
    {
        return Classification::Url(input.to_string());
    }

    if let Some(url) = complete_bare_host(input) {
        return Classification::Url(url);
    }

    Classification::SearchQuery(input.to_string())
}

/// Turn a schemeless host (plus optional port/path/query) into an https URL,
/// or return `None` when the text does not look like a host at all.
fn complete_bare_host(input: &str) -> Option<String> {
    let (host, rest) = split_host(input);

    let candidate = if matches!(parse_ip_host(host), Some(IpAddr::V6(_))) && !host.starts_with('[')
    {
        // Bare IPv6 hosts need brackets before a scheme can be attached.
        format!("https://[{host}]{rest}")
    } else if looks_like_host(host) {
        format!("https://{host}{rest}")
    } else {
        return None;
    };

    Url::parse(&candidate).ok().map(|_| candidate)
}

fn looks_like_host(host: &str) -> bool {
    if host.starts_with("localhost") {
        return true;
    }
    if parse_ip_host(host).is_some() {
        return true;
    }

    // label.tld with an alphabetic TLD of plausible length
    let mut parts = host.rsplitn(2, '.');
    let tld = parts.next().unwrap_or_default();
    if parts.next().is_none() {
        return false;
    }
    let tld = tld.split(':').next().unwrap_or_default();
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_ip_host(host: &str) -> Option<IpAddr> {
    if host.is_empty() {
        return None;
    }

    let host = if let Some(stripped) = host.strip_prefix('[') {
        stripped.split(']').next().unwrap_or(host)
    } else if host.matches(':').count() == 1 {
        // host:port with a v4 or named host; more colons means bare IPv6
        host.split(':').next().unwrap_or(host)
    } else {
        host
    };

    host.parse().ok()
}

/// Split off everything from the first path/query/fragment delimiter.
fn split_host(input: &str) -> (&str, &str) {
    let cut = input
        .find(['/', '?', '#'])
        .unwrap_or(input.len());
    input.split_at(cut)
}

/// Builds search engine URLs from a `%s` template.
#[derive(Debug, Clone)]
pub struct SearchUrlBuilder {
    template: String,
}

impl SearchUrlBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn build(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.template.replace("%s", &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemed_url_passes_through_unchanged() {
        assert_eq!(
            classify("https://example.com/a?b=c#d"),
            Classification::Url("https://example.com/a?b=c#d".to_string())
        );
        assert_eq!(
            classify("http://example.com"),
            Classification::Url("http://example.com".to_string())
        );
    }

    #[test]
    fn bare_domain_gets_https() {
        assert_eq!(
            classify("github.com"),
            Classification::Url("https://github.com".to_string())
        );
        assert_eq!(
            classify("example.com/docs/index.html"),
            Classification::Url("https://example.com/docs/index.html".to_string())
        );
    }

    #[test]
    fn localhost_and_ips_are_urls() {
        assert_eq!(
            classify("localhost:8080"),
            Classification::Url("https://localhost:8080".to_string())
        );
        assert_eq!(
            classify("192.168.1.1/admin"),
            Classification::Url("https://192.168.1.1/admin".to_string())
        );
        assert_eq!(
            classify("::1"),
            Classification::Url("https://[::1]".to_string())
        );
        assert_eq!(
            classify("[::1]:8080"),
            Classification::Url("https://[::1]:8080".to_string())
        );
    }

    #[test]
    fn whitespace_always_means_search() {
        for input in ["weather today", "rust  programming", "what is example.com"] {
            assert_eq!(
                classify(input),
                Classification::SearchQuery(input.to_string())
            );
        }
    }

    #[test]
    fn single_word_is_a_search() {
        assert_eq!(
            classify("weather"),
            Classification::SearchQuery("weather".to_string())
        );
    }

    #[test]
    fn empty_input_is_a_search() {
        assert_eq!(classify("   "), Classification::SearchQuery(String::new()));
    }

    #[test]
    fn implausible_tld_is_a_search() {
        assert_eq!(
            classify("notadomain.abcdefgh"),
            Classification::SearchQuery("notadomain.abcdefgh".to_string())
        );
    }

    #[test]
    fn search_url_builder_encodes_query() {
        let builder = SearchUrlBuilder::new("https://duckduckgo.com/?q=%s");
        assert_eq!(
            builder.build("rust programming"),
            "https://duckduckgo.com/?q=rust+programming"
        );
    }
}

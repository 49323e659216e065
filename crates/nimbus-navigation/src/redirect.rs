//! Search-result redirect unwrapping
//!
//! Search engines rarely link results directly; the href is a wrapper URL
//! whose query string embeds the destination, or a shortener that answers
//! with an HTTP redirect. The resolver recovers the real destination so the
//! history entry records where the user actually went.

use std::time::Duration;

use reqwest::redirect::Policy;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Query parameters that carry the destination on wrapper URLs, checked in
/// order. `uddg` is DuckDuckGo's, `q`/`url` cover Google and friends.
const DESTINATION_PARAMS: &[&str] = &["uddg", "url", "u", "q", "dest", "destination", "target"];

/// Hosts known to answer with an HTTP redirect instead of embedding the
/// destination in the query string.
const REDIRECTOR_HOSTS: &[&str] = &["t.co", "bit.ly", "tinyurl.com", "goo.gl", "ow.ly", "is.gd"];

pub struct RedirectResolver {
    client: reqwest::Client,
    redirect_limit: usize,
    extra_redirector_hosts: Vec<String>,
}

impl RedirectResolver {
    pub fn new(user_agent: &str, timeout: Duration, redirect_limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(redirect_limit))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            redirect_limit,
            extra_redirector_hosts: Vec::new(),
        })
    }

    /// Treat `host` as a redirector in addition to the built-in list.
    pub fn add_redirector_host(&mut self, host: impl Into<String>) {
        self.extra_redirector_hosts.push(host.into());
    }

    /// Resolve a possibly-wrapped URL to its canonical destination.
    ///
    /// Destination query parameters are decoded without any network traffic.
    /// Known redirector hosts are followed over HTTP, bounded by the
    /// configured hop limit. A network failure is not fatal: navigation
    /// proceeds with the original URL.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        let Ok(parsed) = Url::parse(url) else {
            return Ok(url.to_string());
        };

        if let Some(destination) = embedded_destination(&parsed) {
            tracing::debug!(wrapper = %url, destination = %destination, "unwrapped redirect URL");
            return Ok(destination);
        }

        if self.is_redirector(&parsed) {
            return self.follow(parsed).await;
        }

        Ok(url.to_string())
    }

    fn is_redirector(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        REDIRECTOR_HOSTS.iter().any(|h| *h == host)
            || self.extra_redirector_hosts.iter().any(|h| h == host)
    }

    async fn follow(&self, url: Url) -> Result<String> {
        match self.client.get(url.clone()).send().await {
            Ok(response) => Ok(response.url().to_string()),
            Err(err) if err.is_redirect() => Err(NavigationError::RedirectLoop {
                url: url.to_string(),
                limit: self.redirect_limit,
            }),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "redirect resolution failed, keeping original URL");
                Ok(url.to_string())
            }
        }
    }
}

/// Pull a destination URL out of the query string, if one is embedded.
/// `Url::query_pairs` percent-decodes exactly once; a value only counts when
/// it parses as an absolute http(s) URL on its own.
fn embedded_destination(url: &Url) -> Option<String> {
    for param in DESTINATION_PARAMS {
        for (key, value) in url.query_pairs() {
            if key != *param {
                continue;
            }
            if let Ok(destination) = Url::parse(&value) {
                if matches!(destination.scheme(), "http" | "https") {
                    return Some(destination.to_string());
                }
            }
        }
    }
    None
}

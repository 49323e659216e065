//! Content fetching

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;
use crate::Result;

/// A fetched page, ready for the enhancement pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// URL actually reached after any server-side redirects.
    pub final_url: String,
    pub body: String,
    /// Raw `Content-Type` header value, when the server sent one.
    pub content_type: Option<String>,
}

impl FetchResult {
    /// Whether the body is an HTML document. A missing header is treated as
    /// HTML, matching how real servers behave when they skip the header.
    pub fn is_html(&self) -> bool {
        match self.content_type.as_deref() {
            Some(content_type) => {
                let lowered = content_type.to_ascii_lowercase();
                lowered.starts_with("text/html") || lowered.starts_with("application/xhtml+xml")
            }
            None => true,
        }
    }
}

pub struct ContentFetcher {
    client: reqwest::Client,
}

impl ContentFetcher {
    pub fn new(user_agent: &str, timeout: Duration, redirect_limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(redirect_limit))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// Fetch `url`, following server redirects. Non-success statuses fail;
    /// the caller decides what a failed navigation means for history.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(FetchError::classify)?;

        tracing::debug!(
            url = %url,
            final_url = %final_url,
            bytes = body.len(),
            "fetched page"
        );

        Ok(FetchResult {
            final_url,
            body,
            content_type,
        })
    }
}

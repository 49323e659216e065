//! DuckDuckGo instant-answer client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::SearchError;
use crate::Result;

const API_URL: &str = "https://api.duckduckgo.com/";
const HTML_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const CONNECTIVITY_PROBE_URL: &str = "https://duckduckgo.com/";

/// Maximum related topics folded into a result list.
const MAX_RELATED_TOPICS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Instant-answer payload, reduced to the fields the browser displays.
#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(default, rename = "Heading")]
    heading: String,
    #[serde(default, rename = "AbstractText")]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default, rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(default, rename = "Text")]
    text: String,
    #[serde(default, rename = "FirstURL")]
    first_url: String,
}

pub struct SearchClient {
    client: reqwest::Client,
    api_url: String,
    html_search_url: String,
    probe_url: String,
}

impl SearchClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_url: API_URL.to_string(),
            html_search_url: HTML_SEARCH_URL.to_string(),
            probe_url: CONNECTIVITY_PROBE_URL.to_string(),
        })
    }

    /// Redirect every request to different endpoints. Intended for tests.
    pub fn with_endpoints(
        mut self,
        api_url: impl Into<String>,
        html_search_url: impl Into<String>,
        probe_url: impl Into<String>,
    ) -> Self {
        self.api_url = api_url.into();
        self.html_search_url = html_search_url.into();
        self.probe_url = probe_url.into();
        self
    }

    /// Run a query, returning the abstract (when present) followed by up to
    /// ten related topics. Never returns an empty list: when the API has no
    /// instant answer, a single row linking to the full HTML search page is
    /// synthesized.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(self.api_url.as_str())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|err| SearchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(status.as_u16()));
        }

        // The API labels its JSON as x-javascript; parse the bytes directly.
        let body = response
            .text()
            .await
            .map_err(|err| SearchError::Network(err.to_string()))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|err| SearchError::Decode(err.to_string()))?;

        let mut results = Vec::new();

        if !answer.abstract_text.is_empty() {
            let title = if answer.heading.is_empty() {
                "Result".to_string()
            } else {
                answer.heading.clone()
            };
            results.push(SearchResult {
                title,
                url: answer.abstract_url.clone(),
                snippet: answer.abstract_text.clone(),
            });
        }

        for topic in answer.related_topics.iter().take(MAX_RELATED_TOPICS) {
            if topic.text.is_empty() {
                continue;
            }
            results.push(SearchResult {
                title: truncate(&topic.text, 100),
                url: topic.first_url.clone(),
                snippet: topic.text.clone(),
            });
        }

        if results.is_empty() {
            results.push(self.fallback_result(query));
        }

        tracing::debug!(query = %query, results = results.len(), "search completed");
        Ok(results)
    }

    /// Whether the search engine is reachable at all.
    pub async fn is_online(&self) -> bool {
        match self.client.get(self.probe_url.as_str()).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn fallback_result(&self, query: &str) -> SearchResult {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        SearchResult {
            title: format!("Search: {query}"),
            url: format!("{}?q={}", self.html_search_url, encoded),
            snippet: format!("Open the full results page for \"{query}\""),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

//! Search error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Network(String),

    #[error("Search API answered with HTTP {0}")]
    Http(u16),

    #[error("Malformed search response: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

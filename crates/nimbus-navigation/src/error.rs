//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Redirect chain for {url} exceeded {limit} hops")]
    RedirectLoop { url: String, limit: usize },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

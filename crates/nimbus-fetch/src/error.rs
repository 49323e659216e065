//! Fetch error taxonomy

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("Server answered with HTTP {0}")]
    Http(u16),

    #[error("Redirect chain too long while fetching {0}")]
    RedirectLoop(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    #[error("Fetch failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Map a transport error onto the taxonomy. DNS failures surface as
    /// connect errors in reqwest, so the message is sniffed the same way the
    /// connectivity probe does.
    pub(crate) fn classify(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if err.is_redirect() {
            return FetchError::RedirectLoop(err.to_string());
        }
        if err.is_connect() {
            let message = err.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("lookup")
            {
                return FetchError::Dns(message);
            }
            return FetchError::ConnectionRefused(message);
        }
        FetchError::Unknown(err.to_string())
    }

    /// Short stable name for logs and UI badges.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::ConnectionRefused(_) => "connection_refused",
            FetchError::Dns(_) => "dns",
            FetchError::Http(_) => "http",
            FetchError::RedirectLoop(_) => "redirect_loop",
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Client(_) => "client",
            FetchError::Unknown(_) => "unknown",
        }
    }
}

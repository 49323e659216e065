//! Browser configuration
//!
//! Constructed once at startup and read-only afterwards; every tab session
//! reads the same `Arc<Config>`. There is no ambient global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rewrite fetched HTML with the utility stylesheet before display.
    /// Off by default: raw-content loading is less reliable than direct URL
    /// loading on every backend, and the pipeline falls back anyway.
    pub css_enhancement_enabled: bool,
    /// Emit diagnostic records for recovered errors and render-path choices.
    pub debug_mode: bool,
    /// Network timeout for page loads, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum HTTP redirect hops before a chain counts as a loop.
    pub redirect_limit: usize,
    pub user_agent: String,
    /// Search engine URL template; `%s` is replaced with the encoded query.
    pub search_engine: String,
    /// Sampling period for detecting URL changes the core did not initiate.
    pub url_poll_interval_ms: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn url_poll_interval(&self) -> Duration {
        Duration::from_millis(self.url_poll_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            css_enhancement_enabled: false,
            debug_mode: false,
            request_timeout_secs: 10,
            redirect_limit: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            search_engine: "https://duckduckgo.com/?q=%s".to_string(),
            url_poll_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_favor_the_stable_path() {
        let config = Config::default();
        assert!(!config.css_enhancement_enabled);
        assert!(!config.debug_mode);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.search_engine.contains("%s"));
    }
}

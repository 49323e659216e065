//! Nimbus Core
//!
//! Central coordination layer for the Nimbus browser: process-wide
//! configuration, the browser facade, and re-exports of every component
//! crate so embedders depend on one crate.

mod browser;
mod config;
mod error;

pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use nimbus_fetch::{ContentFetcher, FetchError, FetchResult};
pub use nimbus_inspect::{css, js, InspectError};
pub use nimbus_navigation::{
    classify, Classification, NavigationEntry, NavigationError, NavigationHistory,
    RedirectResolver, SearchUrlBuilder,
};
pub use nimbus_render::{
    EnhancementPipeline, ExternalViewerSurface, HeadlessSurface, RenderError, RenderOutcome,
    RenderSurface, SurfaceLoad,
};
pub use nimbus_search::{SearchClient, SearchError, SearchResult};
pub use nimbus_tabs::{spawn_url_sampler, LoadState, TabError, TabManager, TabSession};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

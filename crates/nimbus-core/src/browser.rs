//! Main browser state container
//!
//! The browser owns the configuration, the tab set, and the search client.
//! Rendering surfaces are supplied by the embedding shell per tab; the
//! browser wires each one into a session built from the shared config.

use std::sync::Arc;

use nimbus_fetch::ContentFetcher;
use nimbus_navigation::{RedirectResolver, SearchUrlBuilder};
use nimbus_render::{EnhancementPipeline, RenderSurface};
use nimbus_search::{SearchClient, SearchResult};
use nimbus_tabs::{TabManager, TabSession};

use crate::config::Config;
use crate::Result;

pub struct Browser {
    config: Arc<Config>,
    tabs: TabManager,
    search: SearchClient,
}

impl Browser {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let search = SearchClient::new(&config.user_agent, config.request_timeout())?;

        tracing::info!("browser initialized");

        Ok(Self {
            config,
            tabs: TabManager::new(),
            search,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    /// Open a tab rendering into `surface`; it becomes the active tab.
    pub fn create_tab(&self, surface: Box<dyn RenderSurface>) -> Result<Arc<TabSession>> {
        let fetcher = ContentFetcher::new(
            &self.config.user_agent,
            self.config.request_timeout(),
            self.config.redirect_limit,
        )?;
        let resolver = RedirectResolver::new(
            &self.config.user_agent,
            self.config.request_timeout(),
            self.config.redirect_limit,
        )?;
        let search_urls = SearchUrlBuilder::new(&self.config.search_engine);
        let pipeline = EnhancementPipeline::new(
            self.config.css_enhancement_enabled,
            self.config.debug_mode,
        );

        let session = TabSession::new(surface, fetcher, resolver, search_urls, pipeline);
        Ok(self.tabs.insert(session))
    }

    /// Close a tab, releasing its rendering surface.
    pub fn close_tab(&self, id: &str) -> Result<()> {
        Ok(self.tabs.close(id)?)
    }

    pub fn active_tab(&self) -> Option<Arc<TabSession>> {
        self.tabs.active()
    }

    /// Run a search query. Navigating to a result goes back through
    /// [`TabSession::navigate`] like any other URL.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        Ok(self.search.search(query).await?)
    }
}

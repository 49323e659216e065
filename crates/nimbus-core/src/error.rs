//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] nimbus_navigation::NavigationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] nimbus_fetch::FetchError),

    #[error("Render error: {0}")]
    Render(#[from] nimbus_render::RenderError),

    #[error("Search error: {0}")]
    Search(#[from] nimbus_search::SearchError),

    #[error("Tab error: {0}")]
    Tab(#[from] nimbus_tabs::TabError),

    #[error("Inspection error: {0}")]
    Inspect(#[from] nimbus_inspect::InspectError),
}

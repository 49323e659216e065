//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] nimbus_navigation::NavigationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] nimbus_fetch::FetchError),

    #[error("Render error: {0}")]
    Render(#[from] nimbus_render::RenderError),

    #[error("Tab not found: {0}")]
    NotFound(String),
}

//! Nimbus Search
//!
//! Stateless client for the DuckDuckGo instant-answer API. Navigating to a
//! result re-enters the tab session as an ordinary URL navigation; nothing
//! here touches tab state.

mod client;
mod error;

pub use client::{SearchClient, SearchResult};
pub use error::SearchError;

pub type Result<T> = std::result::Result<T, SearchError>;

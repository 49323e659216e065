//! Nimbus Navigation
//!
//! Everything that happens between the user pressing Enter and a URL being
//! ready to fetch:
//! - Address bar text is classified as a URL or a search query
//! - Search-result links are unwrapped to their real destination
//! - Each tab keeps its own back/forward history

mod error;
mod history;
mod input;
mod redirect;

pub use error::NavigationError;
pub use history::{NavigationEntry, NavigationHistory};
pub use input::{classify, Classification, SearchUrlBuilder};
pub use redirect::RedirectResolver;

pub type Result<T> = std::result::Result<T, NavigationError>;

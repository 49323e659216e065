//! Nimbus Fetch
//!
//! The one place in the browser that performs page-load network I/O. The
//! fetcher follows server-side redirects itself and reports the URL it
//! finally landed on, which is what history records.

mod error;
mod fetcher;

pub use error::FetchError;
pub use fetcher::{ContentFetcher, FetchResult};

pub type Result<T> = std::result::Result<T, FetchError>;

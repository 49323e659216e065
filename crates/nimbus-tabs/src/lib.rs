//! Nimbus Tabs
//!
//! One [`TabSession`] per tab: it owns the tab's history and rendering
//! surface, and drives every navigation through the
//! Idle → Fetching → Rendering state machine. The [`TabManager`] keeps the
//! set of open tabs and which one is active. Tabs never share state, so
//! they run concurrently without any cross-tab locking.

mod error;
mod manager;
mod session;
mod state;

pub use error::TabError;
pub use manager::TabManager;
pub use session::{spawn_url_sampler, TabSession};
pub use state::LoadState;

pub type Result<T> = std::result::Result<T, TabError>;

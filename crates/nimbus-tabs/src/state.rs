//! Load-state machine for a tab's navigation stream
//!
//! ```text
//! Idle
//!   ↓ navigate / replay
//! Fetching
//!   ↓ response arrived
//! Rendering
//!   ↓ surface accepted the page
//! Idle
//! ```
//!
//! Any state may drop to `Failed` when a step errors, and `Failed`
//! immediately drains back to `Idle` so the next navigation can start. A
//! superseding navigation re-enters `Fetching` from wherever the previous
//! one was.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing in flight; the tab shows its current entry.
    Idle,
    /// Waiting on the network.
    Fetching,
    /// Handing content to the rendering surface.
    Rendering,
    /// The last navigation failed; transient, drains to `Idle`.
    Failed,
}

impl LoadState {
    /// Check if a transition to another state is valid.
    pub fn can_transition_to(&self, target: LoadState) -> bool {
        match (self, target) {
            // A new navigation may begin from anywhere (supersession).
            (_, LoadState::Fetching) => true,
            (LoadState::Fetching, LoadState::Rendering) => true,
            // Success, failure drain, and user-initiated stop.
            (LoadState::Rendering, LoadState::Idle) => true,
            (LoadState::Fetching, LoadState::Idle) => true,
            (LoadState::Failed, LoadState::Idle) => true,
            (_, LoadState::Failed) => true,
            // Same state is always valid (no-op).
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// True while a navigation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, LoadState::Fetching | LoadState::Rendering)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Fetching => "fetching",
            LoadState::Rendering => "rendering",
            LoadState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(LoadState::Idle),
            "fetching" => Ok(LoadState::Fetching),
            "rendering" => Ok(LoadState::Rendering),
            "failed" => Ok(LoadState::Failed),
            _ => Err(format!("Unknown load state: {}", s)),
        }
    }
}

//! Per-tab navigation history
//!
//! An in-memory back/forward list with a cursor. Committing a new entry
//! while the cursor sits mid-list discards the forward branch permanently;
//! back and forward only ever move the cursor. History lives and dies with
//! its tab and is never shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One visited location within a tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Exact text the user typed or the link target clicked.
    pub requested_input: String,
    /// Final absolute URL after all redirect resolution.
    pub resolved_url: String,
    /// Best-effort page title; empty when none could be extracted.
    pub title: String,
    /// When the entry was committed.
    pub visited_at: DateTime<Utc>,
}

impl NavigationEntry {
    pub fn new(
        requested_input: impl Into<String>,
        resolved_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            requested_input: requested_input.into(),
            resolved_url: resolved_url.into(),
            title: title.into(),
            visited_at: Utc::now(),
        }
    }

    /// Title for display, falling back to the URL.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.resolved_url
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationHistory {
    entries: Vec<NavigationEntry>,
    /// Index of the current entry; `None` only while `entries` is empty.
    cursor: Option<usize>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed navigation: drop any forward branch, append, and
    /// move the cursor onto the new entry.
    pub fn commit(&mut self, entry: NavigationEntry) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back, returning the entry now under the cursor. `None` when
    /// already at the oldest entry; the cursor does not move in that case.
    pub fn back(&mut self) -> Option<&NavigationEntry> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.entries.get(cursor - 1)
            }
            _ => None,
        }
    }

    /// Step forward; symmetric to [`back`](Self::back).
    pub fn forward(&mut self) -> Option<&NavigationEntry> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => {
                self.cursor = Some(cursor + 1);
                self.entries.get(cursor + 1)
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.entries.get(self.cursor?)
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the current entry in place for navigation the tab did not
    /// initiate itself (in-page links, scripted redirects). Never appends
    /// and never truncates.
    pub fn amend_current(&mut self, resolved_url: &str, title: Option<&str>) {
        let Some(cursor) = self.cursor else { return };
        if let Some(entry) = self.entries.get_mut(cursor) {
            entry.resolved_url = resolved_url.to_string();
            if let Some(title) = title {
                entry.title = title.to_string();
            }
            entry.visited_at = Utc::now();
        }
    }
}

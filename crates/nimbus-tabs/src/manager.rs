//! Tab manager
//!
//! Tracks the set of open tabs and which one is active. Sessions are handed
//! out as `Arc`s; closing a tab drops the manager's reference, and the
//! session (with its rendering surface) is released when the last clone
//! goes away.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::TabError;
use crate::session::TabSession;
use crate::Result;

#[derive(Default)]
pub struct TabManager {
    tabs: RwLock<HashMap<String, Arc<TabSession>>>,
    /// Creation order, for tab-bar display.
    order: RwLock<Vec<String>>,
    active_tab_id: RwLock<Option<String>>,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and make it the active tab.
    pub fn insert(&self, session: TabSession) -> Arc<TabSession> {
        let session = Arc::new(session);
        let id = session.id().to_string();

        self.tabs.write().insert(id.clone(), session.clone());
        self.order.write().push(id.clone());
        *self.active_tab_id.write() = Some(id.clone());

        tracing::info!(tab_id = %id, "created tab");
        session
    }

    pub fn get(&self, id: &str) -> Result<Arc<TabSession>> {
        self.tabs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(id.to_string()))
    }

    /// Close a tab. When it was active, the first remaining tab (in
    /// creation order) becomes active.
    pub fn close(&self, id: &str) -> Result<()> {
        let removed = self.tabs.write().remove(id);
        if removed.is_none() {
            return Err(TabError::NotFound(id.to_string()));
        }
        self.order.write().retain(|tab_id| tab_id != id);

        let mut active = self.active_tab_id.write();
        if active.as_deref() == Some(id) {
            *active = self.order.read().first().cloned();
        }

        tracing::info!(tab_id = %id, "closed tab");
        Ok(())
    }

    pub fn activate(&self, id: &str) -> Result<Arc<TabSession>> {
        let session = self.get(id)?;
        *self.active_tab_id.write() = Some(id.to_string());
        Ok(session)
    }

    pub fn active(&self) -> Option<Arc<TabSession>> {
        let id = self.active_tab_id.read().clone()?;
        self.tabs.read().get(&id).cloned()
    }

    /// Tab ids in creation order.
    pub fn tab_ids(&self) -> Vec<String> {
        self.order.read().clone()
    }

    pub fn len(&self) -> usize {
        self.tabs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.read().is_empty()
    }
}

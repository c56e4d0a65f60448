//! Tab manager view-model
//!
//! Holds the live tab set in host-reported order and exposes per-tab
//! activate/close actions. Closing removes only the one local entry —
//! no re-list, so a close in a tab-heavy session stays O(1) on the view.

use crate::error::Result;
use crate::host::TabHost;
use crate::types::{TabDescriptor, TabFilter, TabId};
use std::sync::Arc;

/// View-model over the host's tab set
pub struct TabManager {
    host: Arc<dyn TabHost>,
    tabs: Vec<TabDescriptor>,
}

impl TabManager {
    pub fn new(host: Arc<dyn TabHost>) -> Self {
        Self {
            host,
            tabs: Vec::new(),
        }
    }

    /// Re-query the host and replace the cached list (host order kept)
    pub async fn refresh(&mut self) -> Result<()> {
        self.tabs = self.host.query(TabFilter::all()).await?;
        Ok(())
    }

    /// Current tab list, host order
    pub fn tabs(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Focus the owning window and switch to the tab
    pub async fn activate(&self, id: TabId) -> Result<()> {
        self.host.activate(id).await
    }

    /// Close the tab on the host, then drop just its view entry
    pub async fn close(&mut self, id: TabId) -> Result<()> {
        self.host.remove(id).await?;
        self.tabs.retain(|tab| tab.id != id);
        Ok(())
    }
}

//! Dashboard aggregation
//!
//! Combines independent host reads (visit count, tab count, bookmark tree,
//! recent activity) into one display-ready [`ActivitySnapshot`]. Each read
//! failure is caught and logged without aborting the others: a missing
//! field renders as zero/absent rather than failing the whole refresh.

use crate::host::HostServices;
use crate::types::{keys, ActivityEntry, ActivitySnapshot, BookmarkNode, TabFilter, RECENT_DISPLAY_LIMIT};
use tracing::warn;

/// Rebuilds the dashboard snapshot from the host services
pub struct DashboardAggregator {
    host: HostServices,
}

impl DashboardAggregator {
    pub fn new(host: HostServices) -> Self {
        Self { host }
    }

    /// Fetch a fresh snapshot. Infallible by design: partial results
    /// replace hard failures.
    pub async fn refresh(&self) -> ActivitySnapshot {
        let mut snapshot = ActivitySnapshot::default();

        // Visit count and activity log are separate reads so one failing
        // field never blanks the other
        let visit_key = [keys::VISIT_COUNT.to_string()];
        match self.host.storage.get(&visit_key).await {
            Ok(map) => {
                snapshot.visit_count = map
                    .get(keys::VISIT_COUNT)
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(0);
            }
            Err(e) => warn!("visit count unavailable: {}", e),
        }

        let activity_key = [keys::RECENT_ACTIVITY.to_string()];
        match self.host.storage.get(&activity_key).await {
            Ok(map) => {
                snapshot.recent = map
                    .get(keys::RECENT_ACTIVITY)
                    .cloned()
                    .and_then(|v| serde_json::from_value::<Vec<ActivityEntry>>(v).ok())
                    .unwrap_or_default();
                snapshot.recent.truncate(RECENT_DISPLAY_LIMIT);
            }
            Err(e) => warn!("recent activity unavailable: {}", e),
        }

        match self.host.tabs.query(TabFilter::all()).await {
            Ok(tabs) => snapshot.tab_count = tabs.len(),
            Err(e) => warn!("tab count unavailable: {}", e),
        }

        match self.host.bookmarks.tree().await {
            Ok(tree) => snapshot.bookmark_count = count_bookmarks(&tree),
            Err(e) => warn!("bookmark tree unavailable: {}", e),
        }

        snapshot
    }
}

/// Count bookmarks in a tree: nodes with a non-empty URL, recursively
/// across all children. Folders carry no URL and are excluded. The host
/// guarantees the tree is acyclic, so no cycle guard is needed.
pub fn count_bookmarks(nodes: &[BookmarkNode]) -> usize {
    nodes
        .iter()
        .map(|node| {
            let own = usize::from(node.url.as_deref().is_some_and(|u| !u.is_empty()));
            own + count_bookmarks(&node.children)
        })
        .sum()
}

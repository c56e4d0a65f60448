//! Core data types for the Argus side panel
//!
//! This module defines the data structures exchanged with the browser host
//! bridge: tabs, bookmark trees, panel options, and the dashboard snapshot.
//! Everything here is plain data; host state is only ever mutated through
//! the capability traits in [`crate::host`].

use serde::{Deserialize, Serialize};

/// Unique identifier for browser tabs
///
/// Wraps the host-assigned integer id to prevent mixing tab ids with
/// window ids elsewhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for browser windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A browser tab as reported by the host
///
/// Read-only from the panel's point of view: activate/close actions mutate
/// host state, never this structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    pub id: TabId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon_url: Option<String>,
    pub window_id: WindowId,
}

/// A node in the host's bookmark tree
///
/// Folders carry no `url` and are excluded from bookmark counts; only
/// nodes with a non-empty `url` count as bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Leaf bookmark with a URL
    pub fn bookmark(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    /// Folder node holding children
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            children,
        }
    }
}

/// One entry in the recent-activity log
///
/// Appended by the background controller, never mutated in place. The
/// stored list keeps the newest entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// How many activity entries the dashboard displays
pub const RECENT_DISPLAY_LIMIT: usize = 5;

/// Display-ready dashboard snapshot
///
/// Rebuilt in full on every refresh, never incrementally patched.
/// Fields a failed host read could not fill stay at their zero defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub visit_count: u64,
    pub tab_count: usize,
    pub bookmark_count: usize,
    /// Newest first, at most [`RECENT_DISPLAY_LIMIT`] entries
    pub recent: Vec<ActivityEntry>,
}

/// Side-panel visibility options held by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    pub path: String,
    pub enabled: bool,
    /// When set, the options apply to one tab instead of globally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            path: crate::background::PANEL_PATH.to_string(),
            enabled: true,
            tab_id: None,
        }
    }
}

/// Filter for tab queries against the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_window: Option<bool>,
}

impl TabFilter {
    /// Match every tab in every window
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the focused tab of the focused window
    pub fn active_current_window() -> Self {
        Self {
            active: Some(true),
            current_window: Some(true),
        }
    }
}

/// Keys of the persisted flat key-value document
///
/// All optional; an absent key reads as falsy/zero.
pub mod keys {
    pub const VISIT_COUNT: &str = "visitCount";
    pub const DAILY_VISITS: &str = "dailyVisits";
    pub const RECENT_ACTIVITY: &str = "recentActivity";
    pub const DARK_MODE: &str = "darkMode";
    pub const AUTO_PIN: &str = "autoPin";
    pub const SHORTCUTS: &str = "shortcuts";
    pub const NOTIFICATIONS: &str = "notifications";
}

//! Argus - Browsing Side Panel Core
//!
//! Glue between a browser host and a side-panel UI:
//! - Dashboard aggregation (visit/tab/bookmark counts, recent activity)
//! - Tool actions (screenshot, bookmark, translate, reading mode, search, pin)
//! - Tab management view-model
//! - Preference persistence and data export
//! - Background lifecycle handling (install, icon click, page loads)
//!
//! # Architecture
//!
//! The host browser's capabilities (storage, tabs, bookmarks, panel
//! visibility) sit behind one narrow async trait each in [`host`]; the rest
//! of the crate is plumbing from those traits into display-ready state.
//! The `argus-panel` binary renders that state as a TUI.
//!
//! # Example
//!
//! ```
//! use argus_core::{DashboardAggregator, HostServices};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let host = HostServices::in_memory();
//! let snapshot = DashboardAggregator::new(host).refresh().await;
//! assert!(snapshot.tab_count > 0);
//! # }
//! ```

pub mod actions;
pub mod background;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod host;
pub mod prefs;
pub mod readtime;
pub mod tabs;
pub mod timefmt;
pub mod types;

// Re-export commonly used types
pub use actions::{ActionOutcome, ToolAction, ToolDispatcher};
pub use background::{BackgroundController, LifecycleEvent};
pub use dashboard::{count_bookmarks, DashboardAggregator};
pub use error::{ArgusError, Result};
pub use host::{HostServices, HttpHost, MemoryHost};
pub use prefs::{PrefKey, PreferenceStore, Preferences};
pub use tabs::TabManager;
pub use types::{
    ActivityEntry, ActivitySnapshot, BookmarkNode, PanelOptions, TabDescriptor, TabFilter, TabId,
    WindowId,
};

//! Host capability abstraction
//!
//! The surrounding browser runtime ("host") exposes storage, tab control,
//! bookmarks, and side-panel visibility as asynchronous request/response
//! services. Each capability group gets one narrow trait so the panel can
//! be driven against a mock in tests without a real host.
//!
//! Two implementations ship:
//! - [`HttpHost`]: talks to a local browser-bridge HTTP API
//! - [`MemoryHost`]: fully in-process, seeded with sample data; backs
//!   offline/demo mode and the test suite

pub mod http;
pub mod memory;

pub use http::HttpHost;
pub use memory::MemoryHost;

use crate::error::Result;
use crate::types::{BookmarkNode, PanelOptions, TabDescriptor, TabFilter, TabId, WindowId};
use async_trait::async_trait;
use std::sync::Arc;

/// Flat key-value document as stored by the host
pub type KvMap = serde_json::Map<String, serde_json::Value>;

/// Key-value storage capability
///
/// Failures map to [`crate::error::ArgusError::StorageUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageHost: Send + Sync {
    /// Read the requested keys; absent keys are simply missing from the map
    async fn get(&self, keys: &[String]) -> Result<KvMap>;

    /// Read the entire document
    async fn get_all(&self) -> Result<KvMap>;

    /// Merge the given entries into the document
    async fn set(&self, entries: KvMap) -> Result<()>;

    /// Drop the entire document. Irreversible; confirmation is the
    /// caller's responsibility.
    async fn clear(&self) -> Result<()>;
}

/// Tab query and control capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TabHost: Send + Sync {
    /// List tabs matching the filter, in host-reported order
    async fn query(&self, filter: TabFilter) -> Result<Vec<TabDescriptor>>;

    /// Focus the owning window and switch to the tab
    async fn activate(&self, id: TabId) -> Result<()>;

    /// Close the tab
    async fn remove(&self, id: TabId) -> Result<()>;

    /// Capture the visible viewport of the window, returning encoded image data
    async fn capture_visible(&self, window_id: WindowId) -> Result<Vec<u8>>;

    /// Open a new tab at the given URL
    async fn create(&self, url: &str) -> Result<TabDescriptor>;

    /// Run a script inside the tab's page, returning its result value
    async fn execute_script(&self, id: TabId, script: &str) -> Result<serde_json::Value>;
}

/// Bookmark capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkHost: Send + Sync {
    /// Create a bookmark entry
    async fn create(&self, title: &str, url: &str) -> Result<BookmarkNode>;

    /// Fetch the full bookmark tree
    async fn tree(&self) -> Result<Vec<BookmarkNode>>;
}

/// Side-panel visibility capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PanelHost: Send + Sync {
    /// Set visibility options, globally or tab-scoped
    async fn set_options(&self, options: PanelOptions) -> Result<()>;

    /// Read the current global options
    async fn options(&self) -> Result<PanelOptions>;

    /// Open the panel in the given window
    async fn open(&self, window_id: WindowId) -> Result<()>;
}

/// One shared handle per capability group
#[derive(Clone)]
pub struct HostServices {
    pub storage: Arc<dyn StorageHost>,
    pub tabs: Arc<dyn TabHost>,
    pub bookmarks: Arc<dyn BookmarkHost>,
    pub panel: Arc<dyn PanelHost>,
}

impl HostServices {
    /// All four capabilities backed by one shared host implementation
    pub fn from_shared<H>(host: Arc<H>) -> Self
    where
        H: StorageHost + TabHost + BookmarkHost + PanelHost + 'static,
    {
        Self {
            storage: host.clone(),
            tabs: host.clone(),
            bookmarks: host.clone(),
            panel: host,
        }
    }

    /// Connect to a browser bridge at the given base URL
    pub fn http(base_url: &str) -> Self {
        Self::from_shared(Arc::new(HttpHost::new(base_url)))
    }

    /// In-process host seeded with sample data (offline/demo mode)
    pub fn in_memory() -> Self {
        Self::from_shared(Arc::new(MemoryHost::seeded()))
    }
}

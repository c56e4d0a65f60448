//! In-process implementation of the host capability traits
//!
//! Backs offline/demo mode and the test suite. State lives behind plain
//! mutexes (never held across an await); tab query calls are counted so
//! tests can assert that closing a tab does not trigger a re-list.

use crate::error::{ArgusError, Result};
use crate::host::{BookmarkHost, KvMap, PanelHost, StorageHost, TabHost};
use crate::types::{BookmarkNode, PanelOptions, TabDescriptor, TabFilter, TabId, WindowId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory browser host
pub struct MemoryHost {
    storage: Mutex<KvMap>,
    tabs: Mutex<Vec<TabDescriptor>>,
    bookmarks: Mutex<Vec<BookmarkNode>>,
    panel: Mutex<PanelOptions>,
    /// Which tab is currently focused
    active_tab: Mutex<Option<TabId>>,
    /// Pages currently in reading mode (toggled via execute_script)
    reading_mode: Mutex<HashSet<TabId>>,
    /// Sample page text returned by page-inspection scripts
    page_text: Mutex<String>,
    next_tab_id: AtomicI64,
    next_bookmark_id: AtomicI64,
    query_calls: AtomicUsize,
}

impl MemoryHost {
    /// Empty host: no tabs, no bookmarks, empty storage
    pub fn new() -> Self {
        Self {
            storage: Mutex::new(KvMap::new()),
            tabs: Mutex::new(Vec::new()),
            bookmarks: Mutex::new(Vec::new()),
            panel: Mutex::new(PanelOptions::default()),
            active_tab: Mutex::new(None),
            reading_mode: Mutex::new(HashSet::new()),
            page_text: Mutex::new(String::new()),
            next_tab_id: AtomicI64::new(1),
            next_bookmark_id: AtomicI64::new(1),
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Host seeded with a handful of tabs, bookmarks, and page text
    pub fn seeded() -> Self {
        let host = Self::new();
        {
            let mut tabs = host.tabs.lock().unwrap();
            tabs.push(TabDescriptor {
                id: TabId(1),
                title: "Example Domain".to_string(),
                url: "https://example.com".to_string(),
                favicon_url: Some("https://example.com/favicon.ico".to_string()),
                window_id: WindowId(1),
            });
            tabs.push(TabDescriptor {
                id: TabId(2),
                title: "The Rust Programming Language".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
                favicon_url: None,
                window_id: WindowId(1),
            });
            tabs.push(TabDescriptor {
                id: TabId(3),
                title: "crates.io".to_string(),
                url: "https://crates.io".to_string(),
                favicon_url: None,
                window_id: WindowId(1),
            });
        }
        *host.active_tab.lock().unwrap() = Some(TabId(1));
        *host.bookmarks.lock().unwrap() = vec![BookmarkNode::folder(
            "root",
            "Bookmarks Bar",
            vec![
                BookmarkNode::bookmark("b1", "Example", "https://example.com"),
                BookmarkNode::folder(
                    "f1",
                    "Reading",
                    vec![BookmarkNode::bookmark(
                        "b2",
                        "Rust Book",
                        "https://doc.rust-lang.org/book/",
                    )],
                ),
            ],
        )];
        *host.page_text.lock().unwrap() =
            "The quick brown fox jumps over the lazy dog. ".repeat(60);
        host.next_tab_id.store(4, Ordering::SeqCst);
        host
    }

    /// Replace the sample page text returned to inspection scripts
    pub fn set_page_text(&self, text: impl Into<String>) {
        *self.page_text.lock().unwrap() = text.into();
    }

    /// Mark a tab as focused
    pub fn focus_tab(&self, id: TabId) {
        *self.active_tab.lock().unwrap() = Some(id);
    }

    /// How many tab queries the panel has issued
    pub fn tab_query_count(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Whether the page in the given tab is currently in reading mode
    pub fn in_reading_mode(&self, id: TabId) -> bool {
        self.reading_mode.lock().unwrap().contains(&id)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageHost for MemoryHost {
    async fn get(&self, keys: &[String]) -> Result<KvMap> {
        let storage = self.storage.lock().unwrap();
        let mut out = KvMap::new();
        for key in keys {
            if let Some(value) = storage.get(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(out)
    }

    async fn get_all(&self) -> Result<KvMap> {
        Ok(self.storage.lock().unwrap().clone())
    }

    async fn set(&self, entries: KvMap) -> Result<()> {
        let mut storage = self.storage.lock().unwrap();
        for (key, value) in entries {
            storage.insert(key, value);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.storage.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl TabHost for MemoryHost {
    async fn query(&self, filter: TabFilter) -> Result<Vec<TabDescriptor>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let tabs = self.tabs.lock().unwrap();
        if filter.active == Some(true) {
            let active = *self.active_tab.lock().unwrap();
            return Ok(tabs
                .iter()
                .filter(|t| Some(t.id) == active)
                .cloned()
                .collect());
        }
        Ok(tabs.clone())
    }

    async fn activate(&self, id: TabId) -> Result<()> {
        let tabs = self.tabs.lock().unwrap();
        if !tabs.iter().any(|t| t.id == id) {
            return Err(ArgusError::HostUnavailable(format!("no such tab: {id}")));
        }
        *self.active_tab.lock().unwrap() = Some(id);
        Ok(())
    }

    async fn remove(&self, id: TabId) -> Result<()> {
        let mut tabs = self.tabs.lock().unwrap();
        let before = tabs.len();
        tabs.retain(|t| t.id != id);
        if tabs.len() == before {
            return Err(ArgusError::HostUnavailable(format!("no such tab: {id}")));
        }
        let mut active = self.active_tab.lock().unwrap();
        if *active == Some(id) {
            *active = tabs.first().map(|t| t.id);
        }
        Ok(())
    }

    async fn capture_visible(&self, _window_id: WindowId) -> Result<Vec<u8>> {
        // PNG signature stands in for real image data
        Ok(vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }

    async fn create(&self, url: &str) -> Result<TabDescriptor> {
        let id = TabId(self.next_tab_id.fetch_add(1, Ordering::SeqCst));
        let tab = TabDescriptor {
            id,
            title: url.to_string(),
            url: url.to_string(),
            favicon_url: None,
            window_id: WindowId(1),
        };
        self.tabs.lock().unwrap().push(tab.clone());
        Ok(tab)
    }

    async fn execute_script(&self, id: TabId, script: &str) -> Result<serde_json::Value> {
        if !self.tabs.lock().unwrap().iter().any(|t| t.id == id) {
            return Err(ArgusError::HostUnavailable(format!("no such tab: {id}")));
        }
        // Emulate the two scripts the panel injects: the reading-mode
        // toggle reports the new state, anything else reads page text.
        if script.contains("reading-mode") {
            let mut reading = self.reading_mode.lock().unwrap();
            let now_on = if reading.contains(&id) {
                reading.remove(&id);
                false
            } else {
                reading.insert(id);
                true
            };
            Ok(serde_json::Value::Bool(now_on))
        } else {
            Ok(serde_json::Value::String(self.page_text.lock().unwrap().clone()))
        }
    }
}

#[async_trait]
impl BookmarkHost for MemoryHost {
    async fn create(&self, title: &str, url: &str) -> Result<BookmarkNode> {
        if url.is_empty() {
            return Err(ArgusError::HostUnavailable("bookmark url is empty".to_string()));
        }
        let id = self.next_bookmark_id.fetch_add(1, Ordering::SeqCst);
        let node = BookmarkNode::bookmark(format!("m{id}"), title, url);
        let mut bookmarks = self.bookmarks.lock().unwrap();
        match bookmarks.first_mut() {
            Some(root) => root.children.push(node.clone()),
            None => bookmarks.push(node.clone()),
        }
        Ok(node)
    }

    async fn tree(&self) -> Result<Vec<BookmarkNode>> {
        Ok(self.bookmarks.lock().unwrap().clone())
    }
}

#[async_trait]
impl PanelHost for MemoryHost {
    async fn set_options(&self, options: PanelOptions) -> Result<()> {
        // Tab-scoped overrides are accepted but only global options are kept
        if options.tab_id.is_none() {
            *self.panel.lock().unwrap() = options;
        }
        Ok(())
    }

    async fn options(&self) -> Result<PanelOptions> {
        Ok(self.panel.lock().unwrap().clone())
    }

    async fn open(&self, _window_id: WindowId) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_get_returns_only_present_keys() {
        let host = MemoryHost::new();
        let mut entries = KvMap::new();
        entries.insert("darkMode".to_string(), serde_json::json!(true));
        host.set(entries).await.unwrap();

        let result = host
            .get(&["darkMode".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["darkMode"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_active_tab_query() {
        let host = MemoryHost::seeded();
        host.focus_tab(TabId(2));

        let active = host
            .query(TabFilter::active_current_window())
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, TabId(2));
    }

    #[tokio::test]
    async fn test_remove_unknown_tab_fails() {
        let host = MemoryHost::seeded();
        let err = host.remove(TabId(99)).await.unwrap_err();
        assert!(matches!(err, ArgusError::HostUnavailable(_)));
    }

    #[tokio::test]
    async fn test_created_tabs_keep_host_order() {
        let host = MemoryHost::new();
        TabHost::create(&host, "https://a.example").await.unwrap();
        TabHost::create(&host, "https://b.example").await.unwrap();

        let tabs = host.query(TabFilter::all()).await.unwrap();
        assert_eq!(tabs[0].url, "https://a.example");
        assert_eq!(tabs[1].url, "https://b.example");
    }

    #[tokio::test]
    async fn test_reading_mode_script_round_trip() {
        let host = MemoryHost::seeded();
        let on = host
            .execute_script(TabId(1), "toggle reading-mode")
            .await
            .unwrap();
        assert_eq!(on, serde_json::Value::Bool(true));
        assert!(host.in_reading_mode(TabId(1)));

        let off = host
            .execute_script(TabId(1), "toggle reading-mode")
            .await
            .unwrap();
        assert_eq!(off, serde_json::Value::Bool(false));
        assert!(!host.in_reading_mode(TabId(1)));
    }
}

//! HTTP implementation of the host capability traits
//!
//! Talks to a local browser-bridge API that proxies the extension runtime.
//! One resource path per capability; JSON bodies throughout. No explicit
//! timeouts: bridge calls are short-lived and local (a hung call leaves the
//! affordance pending, which the design accepts).

use crate::error::{ArgusError, Result};
use crate::host::{BookmarkHost, KvMap, PanelHost, StorageHost, TabHost};
use crate::types::{BookmarkNode, PanelOptions, TabDescriptor, TabFilter, TabId, WindowId};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Host bridge client
pub struct HttpHost {
    client: Client,
    base: String,
}

impl HttpHost {
    /// Create a client for the bridge at `base_url` (e.g. `http://127.0.0.1:9777`)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Storage failures get their own taxonomy entry
fn storage_err(err: reqwest::Error) -> ArgusError {
    ArgusError::StorageUnavailable(err.to_string())
}

fn host_err(err: reqwest::Error) -> ArgusError {
    ArgusError::HostUnavailable(err.to_string())
}

#[async_trait]
impl StorageHost for HttpHost {
    async fn get(&self, keys: &[String]) -> Result<KvMap> {
        debug!("storage get: {:?}", keys);
        self.client
            .get(self.url("/storage"))
            .query(&[("keys", keys.join(","))])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(storage_err)?
            .json::<KvMap>()
            .await
            .map_err(storage_err)
    }

    async fn get_all(&self) -> Result<KvMap> {
        self.client
            .get(self.url("/storage"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(storage_err)?
            .json::<KvMap>()
            .await
            .map_err(storage_err)
    }

    async fn set(&self, entries: KvMap) -> Result<()> {
        self.client
            .post(self.url("/storage"))
            .json(&entries)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(storage_err)?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.client
            .post(self.url("/storage/clear"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl TabHost for HttpHost {
    async fn query(&self, filter: TabFilter) -> Result<Vec<TabDescriptor>> {
        self.client
            .get(self.url("/tabs"))
            .query(&filter)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<Vec<TabDescriptor>>()
            .await
            .map_err(host_err)
    }

    async fn activate(&self, id: TabId) -> Result<()> {
        self.client
            .post(self.url(&format!("/tabs/{id}/activate")))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?;
        Ok(())
    }

    async fn remove(&self, id: TabId) -> Result<()> {
        self.client
            .delete(self.url(&format!("/tabs/{id}")))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?;
        Ok(())
    }

    async fn capture_visible(&self, window_id: WindowId) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(self.url(&format!("/windows/{window_id}/capture")))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .bytes()
            .await
            .map_err(host_err)?;
        Ok(bytes.to_vec())
    }

    async fn create(&self, url: &str) -> Result<TabDescriptor> {
        self.client
            .post(self.url("/tabs"))
            .json(&json!({ "url": url }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<TabDescriptor>()
            .await
            .map_err(host_err)
    }

    async fn execute_script(&self, id: TabId, script: &str) -> Result<serde_json::Value> {
        self.client
            .post(self.url(&format!("/tabs/{id}/execute")))
            .json(&json!({ "script": script }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<serde_json::Value>()
            .await
            .map_err(host_err)
    }
}

#[async_trait]
impl BookmarkHost for HttpHost {
    async fn create(&self, title: &str, url: &str) -> Result<BookmarkNode> {
        self.client
            .post(self.url("/bookmarks"))
            .json(&json!({ "title": title, "url": url }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<BookmarkNode>()
            .await
            .map_err(host_err)
    }

    async fn tree(&self) -> Result<Vec<BookmarkNode>> {
        self.client
            .get(self.url("/bookmarks/tree"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<Vec<BookmarkNode>>()
            .await
            .map_err(host_err)
    }
}

#[async_trait]
impl PanelHost for HttpHost {
    async fn set_options(&self, options: PanelOptions) -> Result<()> {
        self.client
            .put(self.url("/panel/options"))
            .json(&options)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?;
        Ok(())
    }

    async fn options(&self) -> Result<PanelOptions> {
        self.client
            .get(self.url("/panel/options"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?
            .json::<PanelOptions>()
            .await
            .map_err(host_err)
    }

    async fn open(&self, window_id: WindowId) -> Result<()> {
        self.client
            .post(self.url(&format!("/windows/{window_id}/panel/open")))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(host_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let host = HttpHost::new("http://localhost:9777/");
        assert_eq!(host.url("/tabs"), "http://localhost:9777/tabs");

        let host = HttpHost::new("http://localhost:9777");
        assert_eq!(host.url("/storage"), "http://localhost:9777/storage");
    }

    #[tokio::test]
    async fn test_unreachable_bridge_maps_to_taxonomy() {
        // Port 1 is never a bridge; the call must fail with the right variant
        let host = HttpHost::new("http://127.0.0.1:1");
        let err = StorageHost::get_all(&host).await.unwrap_err();
        assert!(matches!(err, ArgusError::StorageUnavailable(_)));

        let err = TabHost::query(&host, TabFilter::all()).await.unwrap_err();
        assert!(matches!(err, ArgusError::HostUnavailable(_)));
    }
}

//! Background lifecycle controller
//!
//! Reacts to host lifecycle events: enables the panel on install, opens it
//! when the toolbar icon is clicked, and on completed page loads applies
//! per-site panel overrides and records the visit (visit counter, daily
//! buckets, recent-activity log).
//!
//! Visit recording is a read-modify-write across two storage calls; the
//! host serializes writes and last-write-wins races are accepted.

use crate::error::Result;
use crate::host::{HostServices, KvMap};
use crate::types::{keys, ActivityEntry, PanelOptions, TabId, WindowId};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default panel document
pub const PANEL_PATH: &str = "sidepanel.html";

/// Site-specific panel shown on GitHub tabs
pub const GITHUB_PANEL_PATH: &str = "github-sidepanel.html";

/// Stored activity entries are capped so the document cannot grow without
/// bound; the dashboard only ever displays the first five.
const STORED_ACTIVITY_CAP: usize = 50;

/// Lifecycle events delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Extension installed or updated
    Installed,
    /// Toolbar icon clicked in a window
    IconClicked { window_id: WindowId },
    /// A tab finished loading a new URL
    TabUpdated {
        tab_id: TabId,
        url: String,
        complete: bool,
    },
}

/// Handles lifecycle events against the host services
pub struct BackgroundController {
    host: HostServices,
}

impl BackgroundController {
    pub fn new(host: HostServices) -> Self {
        Self { host }
    }

    /// Process one event. Failures are logged and swallowed; no lifecycle
    /// event may take the panel down.
    pub async fn handle(&self, event: LifecycleEvent) {
        let result = match event {
            LifecycleEvent::Installed => self.on_installed().await,
            LifecycleEvent::IconClicked { window_id } => self.on_icon_clicked(window_id).await,
            LifecycleEvent::TabUpdated {
                tab_id,
                url,
                complete,
            } => {
                if !complete || url.is_empty() {
                    return;
                }
                self.on_tab_loaded(tab_id, &url).await
            }
        };
        if let Err(e) = result {
            warn!("lifecycle event failed: {}", e);
        }
    }

    /// Enable the panel globally with the default document
    async fn on_installed(&self) -> Result<()> {
        self.host
            .panel
            .set_options(PanelOptions {
                path: PANEL_PATH.to_string(),
                enabled: true,
                tab_id: None,
            })
            .await
    }

    async fn on_icon_clicked(&self, window_id: WindowId) -> Result<()> {
        self.host.panel.open(window_id).await
    }

    async fn on_tab_loaded(&self, tab_id: TabId, url: &str) -> Result<()> {
        if url.contains("github.com") {
            debug!("tab {} gets the GitHub panel", tab_id);
            self.host
                .panel
                .set_options(PanelOptions {
                    path: GITHUB_PANEL_PATH.to_string(),
                    enabled: true,
                    tab_id: Some(tab_id),
                })
                .await?;
        }
        self.record_visit(url).await
    }

    /// Bump the visit counter and today's daily bucket, and prepend an
    /// activity entry (newest first, stored cap applied).
    pub async fn record_visit(&self, url: &str) -> Result<()> {
        let wanted = [
            keys::VISIT_COUNT.to_string(),
            keys::DAILY_VISITS.to_string(),
            keys::RECENT_ACTIVITY.to_string(),
        ];
        let current = self.host.storage.get(&wanted).await?;

        let visit_count = current
            .get(keys::VISIT_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0)
            + 1;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut daily = match current.get(keys::DAILY_VISITS) {
            Some(Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        let today_count = daily.get(&today).and_then(Value::as_u64).unwrap_or(0) + 1;
        daily.insert(today, json!(today_count));

        let mut activity: Vec<ActivityEntry> = current
            .get(keys::RECENT_ACTIVITY)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        activity.insert(
            0,
            ActivityEntry {
                action: format!("Visited {url}"),
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        activity.truncate(STORED_ACTIVITY_CAP);

        let mut entries = KvMap::new();
        entries.insert(keys::VISIT_COUNT.to_string(), json!(visit_count));
        entries.insert(keys::DAILY_VISITS.to_string(), Value::Object(daily));
        entries.insert(keys::RECENT_ACTIVITY.to_string(), serde_json::to_value(activity)?);
        self.host.storage.set(entries).await
    }
}

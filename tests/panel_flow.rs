//! End-to-end flows through the core components against the in-memory host

use argus_core::background::{BackgroundController, LifecycleEvent};
use argus_core::dashboard::DashboardAggregator;
use argus_core::host::{HostServices, MemoryHost, StorageHost};
use argus_core::prefs::{PrefKey, PreferenceStore};
use argus_core::actions::{ToolAction, ToolDispatcher};
use argus_core::tabs::TabManager;
use argus_core::types::{TabId, WindowId, RECENT_DISPLAY_LIMIT};
use std::sync::Arc;

fn services() -> (Arc<MemoryHost>, HostServices) {
    let memory = Arc::new(MemoryHost::seeded());
    let host = HostServices::from_shared(memory.clone());
    (memory, host)
}

#[tokio::test]
async fn bookmark_action_is_reflected_in_next_snapshot() {
    let (_, host) = services();
    let dispatcher = ToolDispatcher::new(host.clone());
    let aggregator = DashboardAggregator::new(host);

    let before = aggregator.refresh().await;
    let outcome = dispatcher.run(ToolAction::Bookmark).await.unwrap();
    assert!(outcome.refresh_dashboard);

    let after = aggregator.refresh().await;
    assert_eq!(after.bookmark_count, before.bookmark_count + 1);
}

#[tokio::test]
async fn preferences_survive_panel_reloads() {
    let (memory, host) = services();
    let store = PreferenceStore::new(host.storage.clone());
    store.set(PrefKey::DarkMode, true).await.unwrap();
    store.set(PrefKey::Shortcuts, true).await.unwrap();

    // A new store over the same host simulates a panel reload
    let reloaded = PreferenceStore::new(memory).load().await.unwrap();
    assert!(reloaded.dark_mode);
    assert!(reloaded.shortcuts);
    assert!(!reloaded.notifications);
}

#[tokio::test]
async fn visits_feed_the_dashboard_newest_first() {
    let (_, host) = services();
    let background = BackgroundController::new(host.clone());
    let aggregator = DashboardAggregator::new(host);

    for i in 0..8 {
        background
            .record_visit(&format!("https://site{i}.example"))
            .await
            .unwrap();
    }

    let snapshot = aggregator.refresh().await;
    assert_eq!(snapshot.visit_count, 8);
    assert_eq!(snapshot.recent.len(), RECENT_DISPLAY_LIMIT);
    assert_eq!(snapshot.recent[0].action, "Visited https://site7.example");
    assert!(snapshot.recent[0].timestamp >= snapshot.recent[4].timestamp);
}

#[tokio::test]
async fn lifecycle_events_enable_and_open_the_panel() {
    let (memory, host) = services();
    let background = BackgroundController::new(host);

    background.handle(LifecycleEvent::Installed).await;
    background
        .handle(LifecycleEvent::IconClicked {
            window_id: WindowId(1),
        })
        .await;

    use argus_core::host::PanelHost;
    let options = memory.options().await.unwrap();
    assert!(options.enabled);
}

#[tokio::test]
async fn closing_tabs_never_triggers_a_relist() {
    let (memory, host) = services();
    let mut manager = TabManager::new(host.tabs.clone());
    manager.refresh().await.unwrap();
    let queries = memory.tab_query_count();

    manager.close(TabId(1)).await.unwrap();
    manager.close(TabId(3)).await.unwrap();

    assert_eq!(manager.len(), 1);
    assert_eq!(memory.tab_query_count(), queries);
}

#[tokio::test]
async fn clear_wipes_counters_and_preferences() {
    let (memory, host) = services();
    let background = BackgroundController::new(host.clone());
    let store = PreferenceStore::new(host.storage.clone());
    background.record_visit("https://a.example").await.unwrap();
    store.set(PrefKey::AutoPin, true).await.unwrap();

    store.clear().await.unwrap();

    assert!(memory.get_all().await.unwrap().is_empty());
    let aggregator = DashboardAggregator::new(host);
    let snapshot = aggregator.refresh().await;
    assert_eq!(snapshot.visit_count, 0);
    assert!(snapshot.recent.is_empty());
}

#[tokio::test]
async fn export_round_trips_the_whole_store() {
    let (_, host) = services();
    let background = BackgroundController::new(host.clone());
    background.record_visit("https://a.example").await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = argus_core::export::export_store(&*host.storage, dir.path())
        .await
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(exported["visitCount"], 1);
    assert!(exported["recentActivity"].is_array());
}

#[tokio::test]
async fn search_and_translate_open_tabs_on_the_host() {
    let (memory, host) = services();
    let dispatcher = ToolDispatcher::new(host);

    assert!(dispatcher.search("best rust book").await.unwrap());
    dispatcher.run(ToolAction::Translate).await.unwrap();

    use argus_core::host::TabHost;
    let tabs = memory
        .query(argus_core::types::TabFilter::all())
        .await
        .unwrap();
    assert_eq!(tabs.len(), 5);
    assert_eq!(
        tabs[3].url,
        "https://www.google.com/search?q=best%20rust%20book"
    );
    assert!(tabs[4].url.starts_with("https://translate.google.com/"));
}

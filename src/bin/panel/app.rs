//! Panel application state and command dispatch
//!
//! The controller keeps all mutable state in one explicit [`App`] struct.
//! Key presses are first classified by the pure [`App::command_for_key`]
//! (testable without a terminal), then [`App::apply`] performs the host
//! effects and folds results back into state.
//!
//! View navigation is a flat state machine: one state per navigable view,
//! transitions only on explicit key presses, no history stack. Entering
//! the tools view refreshes the tab list.

use argus_core::actions::{ToolAction, ToolDispatcher};
use argus_core::dashboard::DashboardAggregator;
use argus_core::export;
use argus_core::host::HostServices;
use argus_core::prefs::{PrefKey, PreferenceStore, Preferences};
use argus_core::tabs::TabManager;
use argus_core::types::ActivitySnapshot;
use crossterm::event::KeyCode;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Navigable views, one state per tab button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Tools,
    Settings,
}

impl View {
    /// All views in display order
    pub fn all() -> [View; 3] {
        [View::Dashboard, View::Tools, View::Settings]
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Tools => "Tools",
            View::Settings => "Settings",
        }
    }

    pub fn shortcut_key(&self) -> char {
        match self {
            View::Dashboard => '1',
            View::Tools => '2',
            View::Settings => '3',
        }
    }

    fn next(&self) -> View {
        match self {
            View::Dashboard => View::Tools,
            View::Tools => View::Settings,
            View::Settings => View::Dashboard,
        }
    }
}

/// What keyboard input currently means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search field
    Search,
    /// Awaiting confirmation of the destructive clear
    ConfirmClear,
}

/// Everything a key press can trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SwitchView(View),
    ToggleSetting(PrefKey),
    Run(ToolAction),
    TogglePin,
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    SubmitSearch,
    CancelSearch,
    SelectNextTab,
    SelectPrevTab,
    ActivateSelected,
    CloseSelected,
    Export,
    RequestClear,
    ConfirmClear,
    CancelClear,
    RefreshDashboard,
    Quit,
}

/// A transient success message
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    expires_at: Instant,
}

const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Application state
pub struct App {
    host: HostServices,
    store: PreferenceStore,
    aggregator: DashboardAggregator,
    dispatcher: ToolDispatcher,
    tab_manager: TabManager,

    pub view: View,
    pub input_mode: InputMode,
    pub prefs: Preferences,
    pub snapshot: ActivitySnapshot,
    pub search_input: String,
    pub selected_tab: usize,
    pub pinned: bool,
    export_dir: PathBuf,
    notice: Option<Notice>,
}

impl App {
    pub fn new(host: HostServices) -> Self {
        Self {
            store: PreferenceStore::new(host.storage.clone()),
            aggregator: DashboardAggregator::new(host.clone()),
            dispatcher: ToolDispatcher::new(host.clone()),
            tab_manager: TabManager::new(host.tabs.clone()),
            host,
            view: View::Dashboard,
            input_mode: InputMode::Normal,
            prefs: Preferences::default(),
            snapshot: ActivitySnapshot::default(),
            search_input: String::new(),
            selected_tab: 0,
            pinned: true,
            export_dir: export::default_export_dir(),
            notice: None,
        }
    }

    /// Startup sequence. Order matters: preferences load first so dark
    /// mode is in effect before the first draw, then the initial snapshot.
    pub async fn init(&mut self) {
        match self.store.load().await {
            Ok(prefs) => self.prefs = prefs,
            Err(e) => warn!("preferences unavailable, using defaults: {}", e),
        }
        match self.host.panel.options().await {
            Ok(options) => self.pinned = options.enabled,
            Err(e) => warn!("panel options unavailable: {}", e),
        }
        if self.prefs.auto_pin && !self.pinned {
            match self.dispatcher.toggle_pin().await {
                Ok(pinned) => self.pinned = pinned,
                Err(e) => warn!("auto-pin failed: {}", e),
            }
        }
        self.snapshot = self.aggregator.refresh().await;
        debug!("initial snapshot: {:?}", self.snapshot);
    }

    /// Where data exports are written
    pub fn set_export_dir(&mut self, dir: PathBuf) {
        self.export_dir = dir;
    }

    /// Tabs shown in the tools view
    pub fn tabs(&self) -> &[argus_core::types::TabDescriptor] {
        self.tab_manager.tabs()
    }

    /// Current transient notice, if any
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Pin affordance: icon and tooltip for the current state
    pub fn pin_indicator(&self) -> (&'static str, &'static str) {
        if self.pinned {
            ("📌", "Unpin side panel")
        } else {
            ("📍", "Pin side panel")
        }
    }

    /// Classify a key press into a command. Pure: no host calls, no
    /// state mutation.
    pub fn command_for_key(&self, key: KeyCode) -> Option<Command> {
        match self.input_mode {
            InputMode::Search => match key {
                KeyCode::Enter => Some(Command::SubmitSearch),
                KeyCode::Esc => Some(Command::CancelSearch),
                KeyCode::Backspace => Some(Command::SearchBackspace),
                KeyCode::Char(c) => Some(Command::SearchChar(c)),
                _ => None,
            },
            InputMode::ConfirmClear => match key {
                KeyCode::Char('y') => Some(Command::ConfirmClear),
                KeyCode::Char('n') | KeyCode::Esc => Some(Command::CancelClear),
                _ => None,
            },
            InputMode::Normal => match key {
                KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
                KeyCode::Char('1') => Some(Command::SwitchView(View::Dashboard)),
                KeyCode::Char('2') => Some(Command::SwitchView(View::Tools)),
                KeyCode::Char('3') => Some(Command::SwitchView(View::Settings)),
                KeyCode::Tab => Some(Command::SwitchView(self.view.next())),
                KeyCode::Char('r') => Some(Command::RefreshDashboard),
                KeyCode::Char('p') => Some(Command::TogglePin),
                _ => match self.view {
                    View::Dashboard => None,
                    View::Tools => match key {
                        KeyCode::Char('/') => Some(Command::StartSearch),
                        KeyCode::Char('c') => Some(Command::Run(ToolAction::Screenshot)),
                        KeyCode::Char('b') => Some(Command::Run(ToolAction::Bookmark)),
                        KeyCode::Char('t') => Some(Command::Run(ToolAction::Translate)),
                        KeyCode::Char('m') => Some(Command::Run(ToolAction::ReadingMode)),
                        KeyCode::Char('i') => Some(Command::Run(ToolAction::ReadingTime)),
                        KeyCode::Down => Some(Command::SelectNextTab),
                        KeyCode::Up => Some(Command::SelectPrevTab),
                        KeyCode::Enter => Some(Command::ActivateSelected),
                        KeyCode::Char('x') | KeyCode::Delete => Some(Command::CloseSelected),
                        _ => None,
                    },
                    View::Settings => match key {
                        KeyCode::Char('d') => Some(Command::ToggleSetting(PrefKey::DarkMode)),
                        KeyCode::Char('a') => Some(Command::ToggleSetting(PrefKey::AutoPin)),
                        KeyCode::Char('s') => Some(Command::ToggleSetting(PrefKey::Shortcuts)),
                        KeyCode::Char('n') => Some(Command::ToggleSetting(PrefKey::Notifications)),
                        KeyCode::Char('e') => Some(Command::Export),
                        KeyCode::Char('x') => Some(Command::RequestClear),
                        _ => None,
                    },
                },
            },
        }
    }

    /// Execute a command. Returns true when the panel should exit.
    /// No command is ever fatal: host failures are logged and the UI
    /// degrades.
    pub async fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return true,

            Command::SwitchView(view) => {
                self.view = view;
                if view == View::Tools {
                    if let Err(e) = self.tab_manager.refresh().await {
                        warn!("tab list unavailable: {}", e);
                    }
                    self.clamp_selected();
                }
            }

            Command::ToggleSetting(key) => {
                let value = self.prefs.toggle(key);
                if let Err(e) = self.store.set(key, value).await {
                    warn!("failed to save {}: {}", key.as_str(), e);
                }
            }

            Command::Run(action) => match self.dispatcher.run(action).await {
                Ok(outcome) => {
                    if let Some(message) = outcome.notification {
                        self.notify(message);
                    }
                    if outcome.refresh_dashboard {
                        self.snapshot = self.aggregator.refresh().await;
                    }
                }
                Err(e) => warn!("{:?} failed: {}", action, e),
            },

            Command::TogglePin => match self.dispatcher.toggle_pin().await {
                Ok(pinned) => self.pinned = pinned,
                Err(e) => warn!("pin toggle failed: {}", e),
            },

            Command::StartSearch => self.input_mode = InputMode::Search,
            Command::SearchChar(c) => self.search_input.push(c),
            Command::SearchBackspace => {
                self.search_input.pop();
            }
            Command::CancelSearch => self.input_mode = InputMode::Normal,
            Command::SubmitSearch => match self.dispatcher.search(&self.search_input).await {
                Ok(true) => {
                    // Cleared only on successful dispatch
                    self.search_input.clear();
                    self.input_mode = InputMode::Normal;
                }
                Ok(false) => {}
                Err(e) => warn!("search failed: {}", e),
            },

            Command::SelectNextTab => {
                if self.selected_tab + 1 < self.tab_manager.len() {
                    self.selected_tab += 1;
                }
            }
            Command::SelectPrevTab => {
                self.selected_tab = self.selected_tab.saturating_sub(1);
            }
            Command::ActivateSelected => {
                let selected = self.tab_manager.tabs().get(self.selected_tab).map(|t| t.id);
                if let Some(id) = selected {
                    if let Err(e) = self.tab_manager.activate(id).await {
                        warn!("activate failed: {}", e);
                    }
                }
            }
            Command::CloseSelected => {
                let selected = self.tab_manager.tabs().get(self.selected_tab).map(|t| t.id);
                if let Some(id) = selected {
                    if let Err(e) = self.tab_manager.close(id).await {
                        warn!("close failed: {}", e);
                    }
                    self.clamp_selected();
                }
            }

            Command::Export => {
                match export::export_store(&*self.host.storage, &self.export_dir).await {
                    Ok(path) => self.notify(format!("Data exported to {}", path.display())),
                    Err(e) => warn!("export failed: {}", e),
                }
            }

            Command::RequestClear => self.input_mode = InputMode::ConfirmClear,
            Command::ConfirmClear => {
                self.input_mode = InputMode::Normal;
                match self.store.clear().await {
                    Ok(()) => {
                        self.prefs = Preferences::default();
                        self.notify("All data cleared");
                        self.snapshot = self.aggregator.refresh().await;
                    }
                    Err(e) => warn!("clear failed: {}", e),
                }
            }
            Command::CancelClear => {
                // Declined: no side effect
                self.input_mode = InputMode::Normal;
            }

            Command::RefreshDashboard => {
                self.snapshot = self.aggregator.refresh().await;
            }
        }
        false
    }

    /// Periodic re-poll: the dashboard always, and the tab list while the
    /// tools view is open, so host-side tab changes show up without
    /// re-entering the view
    pub async fn on_refresh_tick(&mut self) {
        self.snapshot = self.aggregator.refresh().await;
        if self.view == View::Tools {
            if let Err(e) = self.tab_manager.refresh().await {
                warn!("tab list unavailable: {}", e);
            }
            self.clamp_selected();
        }
    }

    /// Expire the transient notice
    pub fn tick(&mut self) {
        if let Some(notice) = &self.notice {
            if Instant::now() >= notice.expires_at {
                self.notice = None;
            }
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    fn clamp_selected(&mut self) {
        let len = self.tab_manager.len();
        if len == 0 {
            self.selected_tab = 0;
        } else if self.selected_tab >= len {
            self.selected_tab = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::host::{KvMap, MemoryHost, StorageHost};
    use argus_core::types::TabId;
    use std::sync::Arc;

    async fn app_over(memory: Arc<MemoryHost>) -> App {
        let mut app = App::new(HostServices::from_shared(memory));
        app.init().await;
        app
    }

    #[tokio::test]
    async fn test_initial_view_is_dashboard() {
        let app = app_over(Arc::new(MemoryHost::seeded())).await;
        assert_eq!(app.view, View::Dashboard);
        assert_eq!(app.snapshot.tab_count, 3);
    }

    #[tokio::test]
    async fn test_view_switch_keys() {
        let app = app_over(Arc::new(MemoryHost::seeded())).await;
        assert_eq!(
            app.command_for_key(KeyCode::Char('2')),
            Some(Command::SwitchView(View::Tools))
        );
        assert_eq!(
            app.command_for_key(KeyCode::Tab),
            Some(Command::SwitchView(View::Tools))
        );
        assert_eq!(app.command_for_key(KeyCode::Char('q')), Some(Command::Quit));
    }

    #[tokio::test]
    async fn test_entering_tools_refreshes_tab_list() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        assert!(app.tabs().is_empty());

        app.apply(Command::SwitchView(View::Tools)).await;
        assert_eq!(app.tabs().len(), 3);
    }

    #[tokio::test]
    async fn test_dark_mode_applies_before_first_draw() {
        let memory = Arc::new(MemoryHost::new());
        let mut entries = KvMap::new();
        entries.insert("darkMode".to_string(), serde_json::json!(true));
        memory.set(entries).await.unwrap();

        // init() alone must leave dark mode active
        let app = app_over(memory).await;
        assert!(app.prefs.dark_mode);
    }

    #[tokio::test]
    async fn test_bookmark_triggers_exactly_one_refresh() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        let before = app.snapshot.bookmark_count;

        app.apply(Command::Run(ToolAction::Bookmark)).await;
        assert_eq!(app.snapshot.bookmark_count, before + 1);
        assert!(app.notice().is_some());
    }

    #[tokio::test]
    async fn test_screenshot_does_not_refresh_snapshot() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        let before = app.snapshot.clone();
        app.apply(Command::Run(ToolAction::Screenshot)).await;
        assert_eq!(app.snapshot, before);
    }

    #[tokio::test]
    async fn test_search_clears_input_only_on_dispatch() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        app.apply(Command::StartSearch).await;
        for c in "openai.com".chars() {
            app.apply(Command::SearchChar(c)).await;
        }
        app.apply(Command::SubmitSearch).await;
        assert!(app.search_input.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_empty_search_keeps_input_mode() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        app.apply(Command::StartSearch).await;
        app.apply(Command::SubmitSearch).await;
        assert_eq!(app.input_mode, InputMode::Search);
    }

    #[tokio::test]
    async fn test_close_selected_drops_one_entry() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        app.apply(Command::SwitchView(View::Tools)).await;
        app.apply(Command::SelectNextTab).await;

        app.apply(Command::CloseSelected).await;
        assert_eq!(app.tabs().len(), 2);
        assert!(!app.tabs().iter().any(|t| t.id == TabId(2)));
    }

    #[tokio::test]
    async fn test_tools_tab_list_stays_live_across_ticks() {
        let memory = Arc::new(MemoryHost::seeded());
        let mut app = app_over(memory.clone()).await;
        app.apply(Command::SwitchView(View::Tools)).await;
        assert_eq!(app.tabs().len(), 3);

        // A tab opened outside the panel shows up on the next tick
        argus_core::host::TabHost::create(&*memory, "https://new.example")
            .await
            .unwrap();
        app.on_refresh_tick().await;
        assert_eq!(app.tabs().len(), 4);
    }

    #[tokio::test]
    async fn test_tick_clamps_selection_after_host_side_close() {
        let memory = Arc::new(MemoryHost::seeded());
        let mut app = app_over(memory.clone()).await;
        app.apply(Command::SwitchView(View::Tools)).await;
        app.apply(Command::SelectNextTab).await;
        app.apply(Command::SelectNextTab).await;
        assert_eq!(app.selected_tab, 2);

        use argus_core::host::TabHost;
        TabHost::remove(&*memory, TabId(2)).await.unwrap();
        TabHost::remove(&*memory, TabId(3)).await.unwrap();
        app.on_refresh_tick().await;

        assert_eq!(app.tabs().len(), 1);
        assert_eq!(app.selected_tab, 0);
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let memory = Arc::new(MemoryHost::seeded());
        let mut app = app_over(memory.clone()).await;
        app.apply(Command::ToggleSetting(PrefKey::DarkMode)).await;

        app.apply(Command::RequestClear).await;
        assert_eq!(app.input_mode, InputMode::ConfirmClear);

        // Declining leaves the store untouched
        app.apply(Command::CancelClear).await;
        assert!(!memory.get_all().await.unwrap().is_empty());

        app.apply(Command::RequestClear).await;
        app.apply(Command::ConfirmClear).await;
        assert!(memory.get_all().await.unwrap().is_empty());
        assert!(!app.prefs.dark_mode);
    }

    #[tokio::test]
    async fn test_confirm_mode_swallows_other_keys() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        app.apply(Command::RequestClear).await;
        assert_eq!(app.command_for_key(KeyCode::Char('q')), None);
        assert_eq!(
            app.command_for_key(KeyCode::Char('y')),
            Some(Command::ConfirmClear)
        );
        assert_eq!(
            app.command_for_key(KeyCode::Esc),
            Some(Command::CancelClear)
        );
    }

    #[tokio::test]
    async fn test_setting_toggle_persists() {
        let memory = Arc::new(MemoryHost::seeded());
        let mut app = app_over(memory.clone()).await;

        app.apply(Command::ToggleSetting(PrefKey::Notifications)).await;
        assert!(app.prefs.notifications);

        // A fresh app over the same host sees the persisted value
        let reloaded = app_over(memory).await;
        assert!(reloaded.prefs.notifications);
    }

    #[tokio::test]
    async fn test_pin_toggle_updates_affordance() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        assert!(app.pinned);
        assert_eq!(app.pin_indicator().0, "📌");

        app.apply(Command::TogglePin).await;
        assert!(!app.pinned);
        assert_eq!(app.pin_indicator().0, "📍");
    }

    #[tokio::test]
    async fn test_export_writes_file_and_notifies() {
        let mut app = app_over(Arc::new(MemoryHost::seeded())).await;
        let dir = tempfile::tempdir().unwrap();
        app.set_export_dir(dir.path().to_path_buf());

        app.apply(Command::Export).await;
        let notice = app.notice().unwrap();
        assert!(notice.message.starts_with("Data exported to"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_auto_pin_repins_on_startup() {
        let memory = Arc::new(MemoryHost::new());
        let mut entries = KvMap::new();
        entries.insert("autoPin".to_string(), serde_json::json!(true));
        memory.set(entries).await.unwrap();
        // Panel starts unpinned
        let mut app = App::new(HostServices::from_shared(memory.clone()));
        app.apply(Command::TogglePin).await;
        assert!(!app.pinned);

        app.init().await;
        assert!(app.pinned);
    }
}

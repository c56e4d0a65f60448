//! Tool action dispatch
//!
//! Each action follows the same two-step protocol: resolve the active tab
//! through the host's tab query, then perform the action against it.
//! Actions are stateless between invocations (reading mode depends on the
//! remote page's current class, which the injected script inspects).
//!
//! Outcomes carry the success notification and whether the dashboard must
//! be refreshed; failures are the caller's to log (best-effort actions
//! never surface user-facing errors beyond the missing notification).

use crate::error::{ArgusError, Result};
use crate::host::HostServices;
use crate::readtime;
use crate::types::{TabDescriptor, TabFilter};
use tracing::debug;

/// Web search endpoint for non-URL queries
pub const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Translation service, parameterized with the percent-encoded page URL
pub const TRANSLATE_URL: &str = "https://translate.google.com/translate?sl=auto&tl=zh&u=";

/// Injected into the page to flip reading mode. Self-inverse: running it
/// twice restores the original class and removes the injected stylesheet.
/// Returns the new state.
pub const READING_MODE_SCRIPT: &str = r#"(() => {
  const body = document.body;
  if (body.classList.contains('reading-mode')) {
    body.classList.remove('reading-mode');
    const style = document.getElementById('reading-mode-style');
    if (style) {
      style.remove();
    }
    return false;
  }
  body.classList.add('reading-mode');
  const style = document.createElement('style');
  style.id = 'reading-mode-style';
  style.textContent = `
    .reading-mode * {
      max-width: 800px !important;
      margin: 0 auto !important;
      font-family: serif !important;
      line-height: 1.6 !important;
    }
    .reading-mode {
      background: #f9f9f9 !important;
      padding: 40px 20px !important;
    }
  `;
  document.head.appendChild(style);
  return true;
})()"#;

/// Injected to read the page text for reading-time estimation
pub const PAGE_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// The discrete tool actions a user can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    Screenshot,
    Bookmark,
    Translate,
    ReadingMode,
    ReadingTime,
}

/// Result of a successfully dispatched action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Transient success message, if the action warrants one
    pub notification: Option<String>,
    /// The action changed data the dashboard displays
    pub refresh_dashboard: bool,
}

impl ActionOutcome {
    fn silent() -> Self {
        Self::default()
    }

    fn notify(message: impl Into<String>) -> Self {
        Self {
            notification: Some(message.into()),
            refresh_dashboard: false,
        }
    }

    fn with_refresh(mut self) -> Self {
        self.refresh_dashboard = true;
        self
    }
}

/// Maps user commands to host calls
pub struct ToolDispatcher {
    host: HostServices,
}

impl ToolDispatcher {
    pub fn new(host: HostServices) -> Self {
        Self { host }
    }

    /// Run one discrete action against the active tab
    pub async fn run(&self, action: ToolAction) -> Result<ActionOutcome> {
        match action {
            ToolAction::Screenshot => self.screenshot().await,
            ToolAction::Bookmark => self.bookmark_page().await,
            ToolAction::Translate => self.translate().await,
            ToolAction::ReadingMode => self.toggle_reading_mode().await,
            ToolAction::ReadingTime => self.reading_time().await,
        }
    }

    async fn active_tab(&self) -> Result<TabDescriptor> {
        let tabs = self.host.tabs.query(TabFilter::active_current_window()).await?;
        tabs.into_iter()
            .next()
            .ok_or_else(|| ArgusError::HostUnavailable("no active tab".to_string()))
    }

    /// Capture the visible viewport of the active tab's window
    async fn screenshot(&self) -> Result<ActionOutcome> {
        let tab = self.active_tab().await?;
        let image = self.host.tabs.capture_visible(tab.window_id).await?;
        debug!("captured {} bytes from window {}", image.len(), tab.window_id);
        Ok(ActionOutcome::notify("Screenshot saved to downloads"))
    }

    /// Bookmark the active tab. A successful creation must be followed by
    /// exactly one dashboard refresh (the outcome flag); a failed one by none.
    async fn bookmark_page(&self) -> Result<ActionOutcome> {
        let tab = self.active_tab().await?;
        self.host.bookmarks.create(&tab.title, &tab.url).await?;
        Ok(ActionOutcome::notify("Page added to bookmarks").with_refresh())
    }

    /// Open the active page through the translation service
    async fn translate(&self) -> Result<ActionOutcome> {
        let tab = self.active_tab().await?;
        self.host.tabs.create(&translate_url(&tab.url)).await?;
        Ok(ActionOutcome::silent())
    }

    /// Flip reading mode on the active page
    async fn toggle_reading_mode(&self) -> Result<ActionOutcome> {
        let tab = self.active_tab().await?;
        let state = self.host.tabs.execute_script(tab.id, READING_MODE_SCRIPT).await?;
        debug!("reading mode on tab {}: {}", tab.id, state);
        Ok(ActionOutcome::silent())
    }

    /// Estimate how long the active page takes to read
    async fn reading_time(&self) -> Result<ActionOutcome> {
        let tab = self.active_tab().await?;
        let value = self.host.tabs.execute_script(tab.id, PAGE_TEXT_SCRIPT).await?;
        let minutes = readtime::estimate_minutes(value.as_str().unwrap_or_default());
        Ok(ActionOutcome::notify(format!("Estimated reading time: {minutes} min")))
    }

    /// Resolve free-text input and open it in a new tab. Returns whether
    /// anything was dispatched (empty input is a no-op); the caller clears
    /// its input field only on `Ok(true)`.
    pub async fn search(&self, input: &str) -> Result<bool> {
        let Some(url) = resolve_search_url(input) else {
            return Ok(false);
        };
        self.host.tabs.create(&url).await?;
        Ok(true)
    }

    /// Flip the panel's pinned state, returning the new state for the
    /// icon/tooltip affordance
    pub async fn toggle_pin(&self) -> Result<bool> {
        let mut options = self.host.panel.options().await?;
        options.enabled = !options.enabled;
        let pinned = options.enabled;
        self.host.panel.set_options(options).await?;
        Ok(pinned)
    }
}

/// Classify free-text input as a URL or a search query and resolve it.
///
/// URL-like means: an explicit http(s) scheme, a `www.` prefix, or an
/// embedded dot. A URL-like input without a scheme gets `https://`
/// prepended unchanged; anything else routes through the web search URL
/// with the query percent-encoded. Empty input resolves to nothing.
pub fn resolve_search_url(input: &str) -> Option<String> {
    let query = input.trim();
    if query.is_empty() {
        return None;
    }
    let url_like = query.starts_with("http://")
        || query.starts_with("https://")
        || query.starts_with("www.")
        || query.contains('.');
    Some(if url_like {
        if query.starts_with("http") {
            query.to_string()
        } else {
            format!("https://{query}")
        }
    } else {
        format!("{SEARCH_URL}{}", urlencoding::encode(query))
    })
}

fn translate_url(page_url: &str) -> String {
    format!("{TRANSLATE_URL}{}", urlencoding::encode(page_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostServices, MemoryHost, MockBookmarkHost, TabHost};
    use crate::types::{TabFilter, TabId};
    use std::sync::Arc;

    fn dispatcher_over(memory: Arc<MemoryHost>) -> ToolDispatcher {
        ToolDispatcher::new(HostServices::from_shared(memory))
    }

    #[test]
    fn test_resolve_bare_domain() {
        assert_eq!(
            resolve_search_url("openai.com").as_deref(),
            Some("https://openai.com")
        );
    }

    #[test]
    fn test_resolve_query_percent_encoded() {
        assert_eq!(
            resolve_search_url("best rust book").as_deref(),
            Some("https://www.google.com/search?q=best%20rust%20book")
        );
    }

    #[test]
    fn test_resolve_explicit_scheme_unchanged() {
        assert_eq!(
            resolve_search_url("https://example.com/a?b=c").as_deref(),
            Some("https://example.com/a?b=c")
        );
        assert_eq!(
            resolve_search_url("http://example.com").as_deref(),
            Some("http://example.com")
        );
    }

    #[test]
    fn test_resolve_www_prefix() {
        assert_eq!(
            resolve_search_url("www.example.com").as_deref(),
            Some("https://www.example.com")
        );
    }

    #[test]
    fn test_resolve_empty_is_none() {
        assert!(resolve_search_url("").is_none());
        assert!(resolve_search_url("   ").is_none());
    }

    #[test]
    fn test_translate_url_encodes_page() {
        let url = translate_url("https://example.com/page?x=1");
        assert_eq!(
            url,
            "https://translate.google.com/translate?sl=auto&tl=zh&u=https%3A%2F%2Fexample.com%2Fpage%3Fx%3D1"
        );
    }

    #[tokio::test]
    async fn test_bookmark_success_requests_refresh() {
        let memory = Arc::new(MemoryHost::seeded());
        let outcome = dispatcher_over(memory).run(ToolAction::Bookmark).await.unwrap();
        assert!(outcome.refresh_dashboard);
        assert!(outcome.notification.is_some());
    }

    #[tokio::test]
    async fn test_bookmark_failure_requests_no_refresh() {
        let memory = Arc::new(MemoryHost::seeded());
        let mut bookmarks = MockBookmarkHost::new();
        bookmarks.expect_create().returning(|_, _| {
            Err(crate::error::ArgusError::HostUnavailable("denied".to_string()))
        });
        let dispatcher = ToolDispatcher::new(HostServices {
            storage: memory.clone(),
            tabs: memory.clone(),
            bookmarks: Arc::new(bookmarks),
            panel: memory,
        });

        assert!(dispatcher.run(ToolAction::Bookmark).await.is_err());
    }

    #[tokio::test]
    async fn test_screenshot_notifies() {
        let memory = Arc::new(MemoryHost::seeded());
        let outcome = dispatcher_over(memory).run(ToolAction::Screenshot).await.unwrap();
        assert!(!outcome.refresh_dashboard);
        assert!(outcome.notification.unwrap().contains("Screenshot"));
    }

    #[tokio::test]
    async fn test_translate_opens_encoded_tab() {
        let memory = Arc::new(MemoryHost::seeded());
        memory.focus_tab(TabId(2));
        dispatcher_over(memory.clone()).run(ToolAction::Translate).await.unwrap();

        let tabs = memory.query(TabFilter::all()).await.unwrap();
        let opened = &tabs.last().unwrap().url;
        assert!(opened.starts_with(TRANSLATE_URL));
        assert!(opened.contains("doc.rust-lang.org"));
    }

    #[tokio::test]
    async fn test_reading_mode_round_trip() {
        let memory = Arc::new(MemoryHost::seeded());
        let dispatcher = dispatcher_over(memory.clone());

        dispatcher.run(ToolAction::ReadingMode).await.unwrap();
        assert!(memory.in_reading_mode(TabId(1)));
        dispatcher.run(ToolAction::ReadingMode).await.unwrap();
        assert!(!memory.in_reading_mode(TabId(1)));
    }

    #[tokio::test]
    async fn test_reading_time_uses_page_text() {
        let memory = Arc::new(MemoryHost::seeded());
        // 100 words at 50 wpm reads in 2 minutes
        memory.set_page_text("word ".repeat(100));
        let outcome = dispatcher_over(memory).run(ToolAction::ReadingTime).await.unwrap();
        assert_eq!(
            outcome.notification.as_deref(),
            Some("Estimated reading time: 2 min")
        );
    }

    #[tokio::test]
    async fn test_search_dispatch_and_empty_noop() {
        let memory = Arc::new(MemoryHost::seeded());
        let dispatcher = dispatcher_over(memory.clone());

        assert!(!dispatcher.search("  ").await.unwrap());
        assert!(dispatcher.search("openai.com").await.unwrap());

        let tabs = memory.query(TabFilter::all()).await.unwrap();
        assert_eq!(tabs.last().unwrap().url, "https://openai.com");
    }

    #[tokio::test]
    async fn test_toggle_pin_flips_host_state() {
        let memory = Arc::new(MemoryHost::seeded());
        let dispatcher = dispatcher_over(memory);

        // Seeded options start enabled
        assert!(!dispatcher.toggle_pin().await.unwrap());
        assert!(dispatcher.toggle_pin().await.unwrap());
    }

    #[tokio::test]
    async fn test_actions_fail_without_active_tab() {
        let memory = Arc::new(MemoryHost::new());
        let err = dispatcher_over(memory).run(ToolAction::Screenshot).await.unwrap_err();
        assert!(matches!(err, crate::error::ArgusError::HostUnavailable(_)));
    }
}

//! Preference store
//!
//! Thin layer over the host's key-value storage for the four user
//! settings. No caching: every read goes to the host, so persisted state
//! survives panel reloads without invalidation logic. Preferences are
//! owned here; no other component writes these keys.

use crate::error::Result;
use crate::host::{KvMap, StorageHost};
use crate::types::keys;
use std::sync::Arc;
use tracing::debug;

/// The named user settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    DarkMode,
    AutoPin,
    Shortcuts,
    Notifications,
}

impl PrefKey {
    /// Storage key for this preference
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::DarkMode => keys::DARK_MODE,
            PrefKey::AutoPin => keys::AUTO_PIN,
            PrefKey::Shortcuts => keys::SHORTCUTS,
            PrefKey::Notifications => keys::NOTIFICATIONS,
        }
    }

    /// All preference keys
    pub fn all() -> [PrefKey; 4] {
        [
            PrefKey::DarkMode,
            PrefKey::AutoPin,
            PrefKey::Shortcuts,
            PrefKey::Notifications,
        ]
    }

    /// Human-readable label for the settings view
    pub fn label(&self) -> &'static str {
        match self {
            PrefKey::DarkMode => "Dark mode",
            PrefKey::AutoPin => "Auto-pin panel",
            PrefKey::Shortcuts => "Keyboard shortcuts",
            PrefKey::Notifications => "Notifications",
        }
    }
}

/// Loaded user settings; an absent key reads as false
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub dark_mode: bool,
    pub auto_pin: bool,
    pub shortcuts: bool,
    pub notifications: bool,
}

impl Preferences {
    /// Current value of one setting
    pub fn get(&self, key: PrefKey) -> bool {
        match key {
            PrefKey::DarkMode => self.dark_mode,
            PrefKey::AutoPin => self.auto_pin,
            PrefKey::Shortcuts => self.shortcuts,
            PrefKey::Notifications => self.notifications,
        }
    }

    /// Flip one setting in place, returning the new value
    pub fn toggle(&mut self, key: PrefKey) -> bool {
        let value = !self.get(key);
        match key {
            PrefKey::DarkMode => self.dark_mode = value,
            PrefKey::AutoPin => self.auto_pin = value,
            PrefKey::Shortcuts => self.shortcuts = value,
            PrefKey::Notifications => self.notifications = value,
        }
        value
    }
}

/// Store for user settings, backed by host storage
pub struct PreferenceStore {
    storage: Arc<dyn StorageHost>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn StorageHost>) -> Self {
        Self { storage }
    }

    /// Read all four settings in one host call
    pub async fn load(&self) -> Result<Preferences> {
        let wanted: Vec<String> = PrefKey::all().iter().map(|k| k.as_str().to_string()).collect();
        let map = self.storage.get(&wanted).await?;
        let read = |key: PrefKey| {
            map.get(key.as_str())
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        };
        Ok(Preferences {
            dark_mode: read(PrefKey::DarkMode),
            auto_pin: read(PrefKey::AutoPin),
            shortcuts: read(PrefKey::Shortcuts),
            notifications: read(PrefKey::Notifications),
        })
    }

    /// Persist one setting
    pub async fn set(&self, key: PrefKey, value: bool) -> Result<()> {
        debug!("saving preference {} = {}", key.as_str(), value);
        let mut entries = KvMap::new();
        entries.insert(key.as_str().to_string(), serde_json::Value::Bool(value));
        self.storage.set(entries).await
    }

    /// Wipe the whole key-value document, preferences included.
    /// Irreversible; the caller must have confirmed with the user first.
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear().await
    }
}

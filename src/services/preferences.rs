//! Per-user UI preferences (the browser's local storage, moved behind a trait).
//!
//! Values are plain strings: booleans are stored as `"true"`/`"false"`, tab
//! selections as element ids. The last write wins; nothing expires.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::core::config::Settings;

pub(crate) const DARK_MODE_KEY: &str = "darkMode";

pub(crate) fn active_tab_key(page_id: &str) -> String {
    format!("activeTab_{page_id}")
}

pub(crate) fn checklist_key(item_id: &str) -> String {
    format!("checklist_{item_id}")
}

#[derive(Debug, Error)]
pub(crate) enum PreferenceError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
}

pub(crate) trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }
}

type Values = BTreeMap<String, String>;

/// Poisoning is ignored: every critical section is a single insert or a
/// whole-map swap.
fn lock(values: &Mutex<Values>) -> MutexGuard<'_, Values> {
    values.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes a preference, logging instead of failing the interaction.
pub(crate) fn remember(store: &dyn PreferenceStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(error = %err, key, "Failed to persist preference");
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemoryPreferences {
    values: Mutex<Values>,
}

impl MemoryPreferences {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every change.
#[derive(Debug)]
pub(crate) struct FilePreferences {
    path: PathBuf,
    values: Mutex<Values>,
}

impl FilePreferences {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), entries = values.len(), "Preferences loaded");
        Ok(Self { path, values: Mutex::new(values) })
    }

    pub(crate) fn from_settings(settings: &Settings) -> Result<Self, PreferenceError> {
        Self::open(&settings.preferences().path)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Values) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// The in-memory map only changes once the file has been written.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn keys_follow_storage_naming() {
        assert_eq!(active_tab_key("day12"), "activeTab_day12");
        assert_eq!(checklist_key("item-3"), "checklist_item-3");
    }

    #[test]
    fn memory_store_last_write_wins() {
        let store = MemoryPreferences::new();
        assert_eq!(store.get(DARK_MODE_KEY), None);
        assert!(!store.flag(DARK_MODE_KEY));

        store.set(DARK_MODE_KEY, "true").expect("set");
        store.set(DARK_MODE_KEY, "false").expect("set");
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
        assert!(!store.flag(DARK_MODE_KEY));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("preferences.json");

        let store = FilePreferences::open(&path).expect("open");
        assert_eq!(store.get("activeTab_day1"), None);
        store.set("activeTab_day1", "tab-code").expect("set");
        store.set(DARK_MODE_KEY, "true").expect("set");

        let reopened = FilePreferences::open(&path).expect("reopen");
        assert_eq!(reopened.get("activeTab_day1").as_deref(), Some("tab-code"));
        assert!(reopened.flag(DARK_MODE_KEY));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn memory_store_keeps_working_after_a_panicking_writer() {
        let store = Arc::new(MemoryPreferences::new());
        let holder = store.clone();
        let result = std::thread::spawn(move || {
            let _guard = holder.values.lock().expect("lock");
            panic!("writer panicked");
        })
        .join();
        assert!(result.is_err());
        assert!(store.values.is_poisoned());

        store.set(DARK_MODE_KEY, "true").expect("set");
        assert!(store.flag(DARK_MODE_KEY));
    }

    #[test]
    fn failed_write_leaves_file_store_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        let store = FilePreferences::open(&path).expect("open");
        store.set("activeTab_day1", "tab-code").expect("set");

        fs::remove_file(&path).expect("remove file");
        fs::create_dir(&path).expect("block the path with a directory");

        let err = store.set("activeTab_day1", "tab-run").expect_err("write must fail");
        assert!(matches!(err, PreferenceError::Io(_)));
        assert_eq!(store.get("activeTab_day1").as_deref(), Some("tab-code"));
        assert_eq!(store.get(DARK_MODE_KEY), None);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        fs::write(&path, "[1, 2]").expect("write");

        let err = FilePreferences::open(&path).expect_err("malformed");
        assert!(matches!(err, PreferenceError::Format(_)));
    }
}

//! Preference cache - small key-value store for UI preferences
//!
//! Values are JSON, kept in a single file. Neither `load` nor `save`
//! ever fails: problems are logged and the caller gets its default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const KEY_SEARCH_TERM: &str = "dashboard.search_term";
pub const KEY_STATUS_FILTER: &str = "dashboard.status_filter";
pub const KEY_PAGE: &str = "app.page";

/// JSON file backed preference store
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user config directory, if one exists
    pub fn user_default() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("triage").join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load `key`, or `default` when missing or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.read_all().remove(key) else {
            return default;
        };
        match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "Failed to load preference");
                default
            }
        }
    }

    /// Store `value` under `key`
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            warn!(key, path = %self.path.display(), error = %e, "Failed to save preference");
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let mut all = self.read_all();
        all.insert(key.to_string(), serde_json::to_value(value)?);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }

    fn read_all(&self) -> Map<String, Value> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read preferences");
                return Map::new();
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt preferences file");
                Map::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_shared::{StatusFilter, TicketStatus};

    #[test]
    fn test_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("prefs.json"));
        assert_eq!(prefs.load(KEY_SEARCH_TERM, "fallback".to_string()), "fallback");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("nested").join("prefs.json"));

        prefs.save(KEY_SEARCH_TERM, &"timeout");
        prefs.save(KEY_STATUS_FILTER, &StatusFilter::Only(TicketStatus::Resolved));

        assert_eq!(prefs.load(KEY_SEARCH_TERM, String::new()), "timeout");
        assert_eq!(
            prefs.load(KEY_STATUS_FILTER, StatusFilter::All),
            StatusFilter::Only(TicketStatus::Resolved)
        );
    }

    #[test]
    fn test_corrupt_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let prefs = Preferences::new(&path);
        assert_eq!(prefs.load(KEY_STATUS_FILTER, StatusFilter::All), StatusFilter::All);

        // Saving over a corrupt file replaces it
        prefs.save(KEY_SEARCH_TERM, &"db");
        assert_eq!(prefs.load(KEY_SEARCH_TERM, String::new()), "db");
    }

    #[test]
    fn test_wrong_type_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("prefs.json"));
        prefs.save(KEY_STATUS_FILTER, &"wontfix");
        assert_eq!(prefs.load(KEY_STATUS_FILTER, StatusFilter::All), StatusFilter::All);
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let prefs = Preferences::new(blocker.join("prefs.json"));
        prefs.save(KEY_SEARCH_TERM, &"ignored");
        assert_eq!(prefs.load(KEY_SEARCH_TERM, "default".to_string()), "default");
    }
}

//! Load/save access to the two configuration sources.
//!
//! Both concrete stores are JSON object files. Saving is a merge-write: the
//! file is re-read, only the patched keys are replaced, and everything else
//! in the file is preserved.

pub mod cli_config;
pub mod editor;

use std::cell::RefCell;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::StoreError;
use crate::settings::{SettingKey, SyncableSettings};

pub use cli_config::CliConfigStore;
pub use editor::{ConfigurationTarget, EditorSettingsStore};

/// A source of syncable settings.
pub trait SettingsStore {
    /// Read the syncable keys currently configured.
    fn load(&self) -> Result<SyncableSettings, StoreError>;

    /// Write `patch`, leaving unrelated keys untouched.
    fn save(&self, patch: &SyncableSettings) -> Result<(), StoreError>;
}

/// In-memory store, used for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RefCell<SyncableSettings>,
}

impl MemoryStore {
    pub fn new(settings: SyncableSettings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> SyncableSettings {
        self.settings.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<SyncableSettings, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, patch: &SyncableSettings) -> Result<(), StoreError> {
        self.settings.borrow_mut().extend(patch.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file helpers
// ---------------------------------------------------------------------------

/// Read a JSON object file. A missing or blank file reads as empty.
pub(crate) fn read_json_object(path: &Path) -> Result<Map<String, Value>, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "settings file does not exist, treating as empty");
        return Ok(Map::new());
    }

    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(&contents).map_err(|e| StoreError::ParseError {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject(path.display().to_string())),
    }
}

/// Write `map` as pretty JSON, creating parent directories as needed.
pub(crate) fn write_json_object(path: &Path, map: &Map<String, Value>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut contents = serde_json::to_string_pretty(map)?;
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

/// Collect syncable keys from `map`, naming each key with `name_of`.
///
/// Values that are not strings, or are empty strings, count as unset.
pub(crate) fn extract_settings(
    map: &Map<String, Value>,
    name_of: impl Fn(SettingKey) -> String,
) -> SyncableSettings {
    let mut settings = SyncableSettings::new();
    for key in SettingKey::ALL {
        let name = name_of(key);
        match map.get(&name) {
            Some(Value::String(value)) if !value.is_empty() => {
                settings.set(key, value.clone());
            }
            Some(Value::String(_)) | None => {}
            Some(other) => {
                debug!(setting = %name, value = %other, "ignoring non-string setting value");
            }
        }
    }
    settings
}

/// Merge `patch` into the object file at `path`.
pub(crate) fn merge_into_file(
    path: &Path,
    patch: &SyncableSettings,
    name_of: impl Fn(SettingKey) -> String,
) -> Result<(), StoreError> {
    let mut map = read_json_object(path)?;
    for (key, value) in patch.iter() {
        map.insert(name_of(key), Value::String(value.to_string()));
    }
    write_json_object(path, &map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_merges() {
        let store = MemoryStore::new([(SettingKey::MainBranch, "main")].into_iter().collect());
        store
            .save(&[(SettingKey::DoneStatus, "Done")].into_iter().collect())
            .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.get(SettingKey::MainBranch), Some("main"));
        assert_eq!(loaded.get(SettingKey::DoneStatus), Some("Done"));
    }

    #[test]
    fn test_read_missing_and_blank() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(read_json_object(&missing).unwrap().is_empty());

        let blank = dir.path().join("blank.json");
        std::fs::write(&blank, "  \n").unwrap();
        assert!(read_json_object(&blank).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            read_json_object(&path),
            Err(StoreError::NotAnObject(_))
        ));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_json_object(&path),
            Err(StoreError::ParseError { .. })
        ));
    }

    #[test]
    fn test_extract_ignores_non_strings_and_empty() {
        let map: Map<String, Value> = serde_json::from_str(
            r#"{"mainBranch": "main", "doneStatus": "", "branchPattern": 3}"#,
        )
        .unwrap();
        let settings = extract_settings(&map, |k| k.cli_name().to_string());
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get(SettingKey::MainBranch), Some("main"));
    }
}

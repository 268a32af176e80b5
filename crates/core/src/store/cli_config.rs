//! The local CLI config file (`~/.config/ghp-cli/config.json`).

use std::path::{Path, PathBuf};

use tracing::info;

use super::{extract_settings, merge_into_file, read_json_object, SettingsStore};
use crate::errors::StoreError;
use crate::settings::{SettingKey, SyncableSettings};

/// JSON config file of the command-line tool, keyed by CLI names.
#[derive(Debug, Clone)]
pub struct CliConfigStore {
    path: PathBuf,
}

impl CliConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's home directory.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("ghp-cli").join("config.json"))
            .ok_or_else(|| StoreError::PathUnavailable("home directory not found".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for CliConfigStore {
    fn load(&self) -> Result<SyncableSettings, StoreError> {
        info!(path = %self.path.display(), "loading CLI config");
        let map = read_json_object(&self.path)?;
        Ok(extract_settings(&map, |key| key.cli_name().to_string()))
    }

    fn save(&self, patch: &SyncableSettings) -> Result<(), StoreError> {
        info!(path = %self.path.display(), keys = patch.len(), "writing CLI config");
        merge_into_file(&self.path, patch, |key: SettingKey| key.cli_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_cli_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"mainBranch": "main", "branchPattern": "{user}/{title}", "token": "x"}"#,
        )
        .unwrap();

        let settings = CliConfigStore::new(&path).load().unwrap();
        assert_eq!(settings.get(SettingKey::MainBranch), Some("main"));
        assert_eq!(settings.get(SettingKey::BranchPattern), Some("{user}/{title}"));
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn test_save_preserves_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"mainBranch": "main", "token": "x"}"#).unwrap();

        let store = CliConfigStore::new(&path);
        store
            .save(&[(SettingKey::DoneStatus, "Done")].into_iter().collect())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "x");
        assert_eq!(raw["mainBranch"], "main");
        assert_eq!(raw["doneStatus"], "Done");
    }

    #[test]
    fn test_save_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = CliConfigStore::new(&path);
        store
            .save(&[(SettingKey::MainBranch, "trunk")].into_iter().collect())
            .unwrap();
        assert_eq!(store.load().unwrap().get(SettingKey::MainBranch), Some("trunk"));
    }
}

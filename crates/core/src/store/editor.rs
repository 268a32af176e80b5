//! The editor's `settings.json`, at user (global) or workspace scope.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{extract_settings, merge_into_file, read_json_object, SettingsStore};
use crate::errors::{ConfigError, StoreError};
use crate::settings::{SettingKey, SyncableSettings};

/// Which editor settings file to read and write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationTarget {
    /// The user-level settings file.
    #[default]
    Global,
    /// `.vscode/settings.json` inside a workspace folder.
    Workspace,
}

impl fmt::Display for ConfigurationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Workspace => write!(f, "workspace"),
        }
    }
}

impl FromStr for ConfigurationTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" | "user" => Ok(Self::Global),
            "workspace" => Ok(Self::Workspace),
            other => Err(ConfigError::InvalidValue {
                field: "editor.target".into(),
                detail: format!("'{}' is not one of: global, workspace", other),
            }),
        }
    }
}

/// Editor settings file holding flat, section-qualified keys such as
/// `ghProjects.mainBranch`.
#[derive(Debug, Clone)]
pub struct EditorSettingsStore {
    path: PathBuf,
    target: ConfigurationTarget,
}

impl EditorSettingsStore {
    pub fn new(path: impl Into<PathBuf>, target: ConfigurationTarget) -> Self {
        Self {
            path: path.into(),
            target,
        }
    }

    /// Locate the settings file for `target`.
    ///
    /// Workspace scope uses `workspace_dir`, falling back to the current
    /// directory.
    pub fn for_target(
        target: ConfigurationTarget,
        workspace_dir: Option<&Path>,
    ) -> Result<Self, StoreError> {
        let path = match target {
            ConfigurationTarget::Global => dirs::config_dir()
                .map(|dir| dir.join("Code").join("User").join("settings.json"))
                .ok_or_else(|| {
                    StoreError::PathUnavailable("user config directory not found".into())
                })?,
            ConfigurationTarget::Workspace => {
                let root = match workspace_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => std::env::current_dir()?,
                };
                root.join(".vscode").join("settings.json")
            }
        };
        Ok(Self::new(path, target))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target(&self) -> ConfigurationTarget {
        self.target
    }
}

impl SettingsStore for EditorSettingsStore {
    fn load(&self) -> Result<SyncableSettings, StoreError> {
        info!(path = %self.path.display(), target = %self.target, "loading editor settings");
        let map = read_json_object(&self.path)?;
        Ok(extract_settings(&map, SettingKey::qualified_editor_name))
    }

    fn save(&self, patch: &SyncableSettings) -> Result<(), StoreError> {
        info!(
            path = %self.path.display(),
            target = %self.target,
            keys = patch.len(),
            "writing editor settings"
        );
        merge_into_file(&self.path, patch, SettingKey::qualified_editor_name)
    }
}

//! Application configuration for the `ghprojects` tool.
//!
//! This is the tool's own TOML file. It says where the two synced sources
//! live and supplies fallbacks for branch naming. It is not itself one of the
//! synced sources.

use std::path::{Path, PathBuf};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::branch::naming::{DEFAULT_BRANCH_PATTERN, DEFAULT_MAX_LENGTH, PLACEHOLDERS};
use crate::errors::{ConfigError, StoreError};
use crate::store::{CliConfigStore, ConfigurationTarget, EditorSettingsStore};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Location of the CLI config file.
    #[serde(default)]
    pub cli_config: CliConfigSection,

    /// Which editor settings file to sync with.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Branch naming fallbacks.
    #[serde(default)]
    pub branch: BranchConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfigSection {
    /// Path to the CLI's `config.json`. Defaults to `~/.config/ghp-cli/config.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// `global` (user settings) or `workspace`.
    #[serde(default)]
    pub target: ConfigurationTarget,

    /// Explicit settings file, overriding the one derived from `target`.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Workspace folder for `workspace` target. Defaults to the current directory.
    #[serde(default)]
    pub workspace_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Pattern used when the CLI config has no `branchPattern`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Maximum branch name length.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Default value for `{user}`.
    #[serde(default)]
    pub user: Option<String>,
}

fn default_pattern() -> String {
    DEFAULT_BRANCH_PATTERN.into()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            max_length: default_max_length(),
            user: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.expand_paths();

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Like [`AppConfig::load_from_file`], but a missing file yields defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::FileNotFound(path)) => {
                debug!(path = %path, "no configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Default config location: `~/.config/ghprojects/config.toml`.
    pub fn default_path() -> PathBuf {
        expand_tilde(Path::new("~/.config/ghprojects/config.toml"))
    }

    fn expand_paths(&mut self) {
        for path in [
            &mut self.cli_config.path,
            &mut self.editor.settings_path,
            &mut self.editor.workspace_dir,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_tilde(&*path);
        }
    }

    /// Validate values that would otherwise fail later and less clearly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branch.max_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "branch.max_length".into(),
                detail: "max length must be > 0".into(),
            });
        }
        validate_branch_pattern(&self.branch.pattern).map_err(|detail| {
            ConfigError::InvalidValue {
                field: "branch.pattern".into(),
                detail,
            }
        })?;
        if matches!(self.logging.level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!("unknown level '{}'", self.logging.level),
            })
        }
    }

    /// Convenience: load (or default) and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// The CLI config store this configuration points at.
    pub fn cli_store(&self) -> Result<CliConfigStore, StoreError> {
        match &self.cli_config.path {
            Some(path) => Ok(CliConfigStore::new(path)),
            None => CliConfigStore::default_path().map(CliConfigStore::new),
        }
    }

    /// The editor store, optionally overriding the configured target.
    pub fn editor_store(
        &self,
        target: Option<ConfigurationTarget>,
    ) -> Result<EditorSettingsStore, StoreError> {
        let target = target.unwrap_or(self.editor.target);
        match &self.editor.settings_path {
            Some(path) => Ok(EditorSettingsStore::new(path, target)),
            None => EditorSettingsStore::for_target(target, self.editor.workspace_dir.as_deref()),
        }
    }

    /// Generate a default TOML config template string.
    pub fn default_template() -> &'static str {
        r#"# ghprojects configuration

[logging]
level = "warn"

[cli_config]
# path = "~/.config/ghp-cli/config.json"

[editor]
target = "global"          # or "workspace"
# settings_path = "~/.config/Code/User/settings.json"
# workspace_dir = "~/src/my-project"

[branch]
pattern = "{user}/{number}-{title}"
max_length = 60
# user = "your-github-login"
"#
    }
}

/// Check that `pattern` is non-empty and uses only known placeholders.
pub fn validate_branch_pattern(pattern: &str) -> Result<(), String> {
    if pattern.trim().is_empty() {
        return Err("pattern must not be empty".into());
    }
    let placeholder = Regex::new(r"\{[^{}]*\}").map_err(|e| e.to_string())?;
    for m in placeholder.find_iter(pattern) {
        if !PLACEHOLDERS.contains(&m.as_str()) {
            return Err(format!(
                "unknown placeholder '{}', expected one of {}",
                m.as_str(),
                PLACEHOLDERS.join(", ")
            ));
        }
    }
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

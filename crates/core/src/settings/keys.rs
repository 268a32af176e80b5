//! The closed set of syncable setting keys and their name tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Section prefix under which the editor stores its settings.
pub const EDITOR_SECTION: &str = "ghProjects";

/// A setting both the CLI config and the editor config can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    /// Default branch new work branches are cut from.
    MainBranch,
    /// Template used to name new branches.
    BranchPattern,
    /// Project status an item moves to when work starts.
    StartWorkingStatus,
    /// Project status an item moves to when its PR merges.
    DoneStatus,
}

// (key, cli name, editor name, display name)
const KEY_TABLE: [(SettingKey, &str, &str, &str); 4] = [
    (SettingKey::MainBranch, "mainBranch", "mainBranch", "Main Branch"),
    (
        SettingKey::BranchPattern,
        "branchPattern",
        "branchNamePattern",
        "Branch Name Pattern",
    ),
    (
        SettingKey::StartWorkingStatus,
        "startWorkingStatus",
        "startWorkingStatus",
        "Start Working Status",
    ),
    (SettingKey::DoneStatus, "doneStatus", "prMergedStatus", "Done Status"),
];

impl SettingKey {
    /// Every syncable key, in canonical order.
    pub const ALL: [SettingKey; 4] = [
        SettingKey::MainBranch,
        SettingKey::BranchPattern,
        SettingKey::StartWorkingStatus,
        SettingKey::DoneStatus,
    ];

    fn row(self) -> &'static (SettingKey, &'static str, &'static str, &'static str) {
        // KEY_TABLE is ordered like the enum.
        &KEY_TABLE[self as usize]
    }

    /// Canonical identifier, identical to the CLI config name.
    pub fn as_str(self) -> &'static str {
        self.cli_name()
    }

    /// Name of the key in the CLI config file.
    pub fn cli_name(self) -> &'static str {
        self.row().1
    }

    /// Name of the key inside the editor's `ghProjects` section.
    pub fn editor_name(self) -> &'static str {
        self.row().2
    }

    /// Fully qualified editor setting, e.g. `ghProjects.branchNamePattern`.
    pub fn qualified_editor_name(self) -> String {
        format!("{}.{}", EDITOR_SECTION, self.editor_name())
    }

    /// Human-readable label used in prompts and tables.
    pub fn display_name(self) -> &'static str {
        self.row().3
    }

    /// Look up a key by its CLI config name.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        KEY_TABLE
            .iter()
            .find(|(_, cli, _, _)| *cli == name)
            .map(|(key, ..)| *key)
    }

    /// Look up a key by its editor name, with or without the section prefix.
    pub fn from_editor_name(name: &str) -> Option<Self> {
        let bare = name
            .strip_prefix(EDITOR_SECTION)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        KEY_TABLE
            .iter()
            .find(|(_, _, editor, _)| *editor == bare)
            .map(|(key, ..)| *key)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    /// Accepts the canonical (CLI) name or any form of the editor name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cli_name(s)
            .or_else(|| Self::from_editor_name(s))
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// One of the two configuration sources being reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The local CLI config file.
    Cli,
    /// The editor's settings.
    Editor,
}

impl Source {
    /// The other side of the sync.
    pub fn opposite(self) -> Self {
        match self {
            Self::Cli => Self::Editor,
            Self::Editor => Self::Cli,
        }
    }

    /// Short label for prompts and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cli => "CLI",
            Self::Editor => "VS Code",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for key in SettingKey::ALL {
            assert_eq!(key.row().0, key);
        }
    }

    #[test]
    fn test_name_tables_are_bijective() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_cli_name(key.cli_name()), Some(key));
            assert_eq!(SettingKey::from_editor_name(key.editor_name()), Some(key));
        }
    }

    #[test]
    fn test_renamed_keys() {
        assert_eq!(SettingKey::BranchPattern.editor_name(), "branchNamePattern");
        assert_eq!(SettingKey::DoneStatus.editor_name(), "prMergedStatus");
        assert_eq!(
            SettingKey::DoneStatus.qualified_editor_name(),
            "ghProjects.prMergedStatus"
        );
    }

    #[test]
    fn test_from_editor_name_with_prefix() {
        assert_eq!(
            SettingKey::from_editor_name("ghProjects.branchNamePattern"),
            Some(SettingKey::BranchPattern)
        );
        assert_eq!(SettingKey::from_editor_name("other.mainBranch"), None);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("mainBranch".parse::<SettingKey>(), Ok(SettingKey::MainBranch));
        assert_eq!("prMergedStatus".parse::<SettingKey>(), Ok(SettingKey::DoneStatus));
        assert_eq!(
            "theme".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey("theme".into()))
        );
    }

    #[test]
    fn test_source_opposite() {
        assert_eq!(Source::Cli.opposite(), Source::Editor);
        assert_eq!(Source::Editor.opposite(), Source::Cli);
        assert_eq!(Source::Editor.to_string(), "VS Code");
    }
}

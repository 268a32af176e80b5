//! Conflict resolution.
//!
//! Turns per-key decisions into a pair of [`MergePatches`]: the values to
//! write into the CLI config and the values to write into the editor config.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::diff::SettingsDiff;
use super::keys::{SettingKey, Source};
use super::SyncableSettings;
use crate::errors::SettingsError;

/// How to settle a single conflicting key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    /// Keep the CLI value and copy it to the editor.
    UseCli,
    /// Keep the editor value and copy it to the CLI config.
    UseEditor,
    /// Write a new value to both sides.
    UseCustom(String),
    /// Leave both sides untouched.
    Skip,
}

impl ConflictResolution {
    /// The value this resolution settles on, if any.
    pub fn resolved_value<'a>(&'a self, cli_value: &'a str, editor_value: &'a str) -> Option<&'a str> {
        match self {
            Self::UseCli => Some(cli_value),
            Self::UseEditor => Some(editor_value),
            Self::UseCustom(value) => Some(value.as_str()),
            Self::Skip => None,
        }
    }

    /// Keep the value held by `source`.
    pub fn prefer(source: Source) -> Self {
        match source {
            Source::Cli => Self::UseCli,
            Source::Editor => Self::UseEditor,
        }
    }
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseCli => write!(f, "cli"),
            Self::UseEditor => write!(f, "editor"),
            Self::UseCustom(value) => write!(f, "custom:{}", value),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for ConflictResolution {
    type Err = SettingsError;

    /// Parses `cli`, `editor` (or `vscode`), `skip`, or `custom:<value>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix("custom:") {
            return Ok(Self::UseCustom(value.to_string()));
        }
        match s {
            "cli" => Ok(Self::UseCli),
            "editor" | "vscode" => Ok(Self::UseEditor),
            "skip" => Ok(Self::Skip),
            other => Err(SettingsError::InvalidResolution {
                key: String::new(),
                value: other.to_string(),
            }),
        }
    }
}

/// Parse a `KEY=RESOLUTION` pair, e.g. `mainBranch=cli`.
pub fn parse_resolution_arg(arg: &str) -> Result<(SettingKey, ConflictResolution), SettingsError> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| SettingsError::InvalidResolution {
            key: arg.to_string(),
            value: String::new(),
        })?;
    let key: SettingKey = key.trim().parse()?;
    let resolution = value
        .parse()
        .map_err(|_| SettingsError::InvalidResolution {
            key: key.to_string(),
            value: value.to_string(),
        })?;
    Ok((key, resolution))
}

/// Values to write into each source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePatches {
    /// Patch for the CLI config.
    pub cli: SyncableSettings,
    /// Patch for the editor config.
    pub editor: SyncableSettings,
}

impl MergePatches {
    pub fn is_empty(&self) -> bool {
        self.cli.is_empty() && self.editor.is_empty()
    }

    /// The patch destined for `source`.
    pub fn for_source(&self, source: Source) -> &SyncableSettings {
        match source {
            Source::Cli => &self.cli,
            Source::Editor => &self.editor,
        }
    }

    fn for_source_mut(&mut self, source: Source) -> &mut SyncableSettings {
        match source {
            Source::Cli => &mut self.cli,
            Source::Editor => &mut self.editor,
        }
    }

    /// Union with `other`; `other` wins where both patch the same key.
    pub fn merge(&mut self, other: MergePatches) {
        self.cli.extend(other.cli);
        self.editor.extend(other.editor);
    }
}

/// Apply `resolutions` to the conflicts in `diff`.
///
/// Conflicts with no entry in `resolutions` are skipped. Entries for keys
/// that are not in conflict are ignored. One-sided entries are never
/// included here; see [`propagate_one_sided`].
///
/// `dry_run` only changes what is logged. This function never performs I/O.
pub fn resolve_conflicts(
    diff: &SettingsDiff,
    resolutions: &BTreeMap<SettingKey, ConflictResolution>,
    dry_run: bool,
) -> MergePatches {
    let mut patches = MergePatches::default();

    for conflict in &diff.conflicts {
        let Some(resolution) = resolutions.get(&conflict.key) else {
            debug!(key = %conflict.key, "conflict left unresolved");
            continue;
        };

        match resolution {
            ConflictResolution::UseCli => {
                patches.editor.set(conflict.key, conflict.cli_value.clone());
            }
            ConflictResolution::UseEditor => {
                patches.cli.set(conflict.key, conflict.editor_value.clone());
            }
            ConflictResolution::UseCustom(value) => {
                patches.cli.set(conflict.key, value.clone());
                patches.editor.set(conflict.key, value.clone());
            }
            ConflictResolution::Skip => {}
        }
        debug!(key = %conflict.key, %resolution, "conflict resolved");
    }

    for key in resolutions.keys() {
        if !diff.conflicts.iter().any(|c| c.key == *key) {
            debug!(%key, "ignoring resolution for key that is not in conflict");
        }
    }

    info!(
        dry_run,
        cli_writes = patches.cli.len(),
        editor_writes = patches.editor.len(),
        "conflict resolution computed"
    );
    patches
}

/// Copy approved one-sided values to the side that lacks them.
///
/// A key present only in the CLI config lands in the editor patch, and vice
/// versa. Approved keys that are not one-sided are ignored.
pub fn propagate_one_sided(diff: &SettingsDiff, approved: &BTreeSet<SettingKey>) -> MergePatches {
    let mut patches = MergePatches::default();

    for source in [Source::Cli, Source::Editor] {
        for entry in diff.only_in(source) {
            if approved.contains(&entry.key) {
                patches
                    .for_source_mut(source.opposite())
                    .set(entry.key, entry.value.clone());
            }
        }
    }

    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::diff::compute_diff;

    fn conflicting_diff() -> SettingsDiff {
        let cli: SyncableSettings = [
            (SettingKey::MainBranch, "main"),
            (SettingKey::DoneStatus, "Done"),
            (SettingKey::StartWorkingStatus, "In Progress"),
        ]
        .into_iter()
        .collect();
        let editor: SyncableSettings = [
            (SettingKey::MainBranch, "master"),
            (SettingKey::DoneStatus, "Shipped"),
            (SettingKey::BranchPattern, "{user}/{title}"),
        ]
        .into_iter()
        .collect();
        compute_diff(&cli, &editor, &SettingKey::ALL)
    }

    #[test]
    fn test_use_cli_writes_editor_patch() {
        let diff = conflicting_diff();
        let resolutions = BTreeMap::from([(SettingKey::MainBranch, ConflictResolution::UseCli)]);

        let patches = resolve_conflicts(&diff, &resolutions, false);

        assert_eq!(patches.editor.get(SettingKey::MainBranch), Some("main"));
        assert!(patches.cli.is_empty());
    }

    #[test]
    fn test_use_editor_writes_cli_patch() {
        let diff = conflicting_diff();
        let resolutions =
            BTreeMap::from([(SettingKey::DoneStatus, ConflictResolution::UseEditor)]);

        let patches = resolve_conflicts(&diff, &resolutions, false);

        assert_eq!(patches.cli.get(SettingKey::DoneStatus), Some("Shipped"));
        assert!(patches.editor.is_empty());
    }

    #[test]
    fn test_custom_writes_both() {
        let diff = conflicting_diff();
        let resolutions = BTreeMap::from([(
            SettingKey::MainBranch,
            ConflictResolution::UseCustom("develop".into()),
        )]);

        let patches = resolve_conflicts(&diff, &resolutions, true);

        assert_eq!(patches.cli.get(SettingKey::MainBranch), Some("develop"));
        assert_eq!(patches.editor.get(SettingKey::MainBranch), Some("develop"));
    }

    #[test]
    fn test_unresolved_and_skip_write_nothing() {
        let diff = conflicting_diff();
        let resolutions = BTreeMap::from([(SettingKey::MainBranch, ConflictResolution::Skip)]);
        assert!(resolve_conflicts(&diff, &resolutions, false).is_empty());
        assert!(resolve_conflicts(&diff, &BTreeMap::new(), false).is_empty());
    }

    #[test]
    fn test_one_sided_entries_not_included() {
        let diff = conflicting_diff();
        let resolutions = BTreeMap::from([
            (SettingKey::StartWorkingStatus, ConflictResolution::UseCli),
            (SettingKey::BranchPattern, ConflictResolution::UseEditor),
        ]);
        assert!(resolve_conflicts(&diff, &resolutions, false).is_empty());
    }

    #[test]
    fn test_dry_run_produces_same_patches() {
        let diff = conflicting_diff();
        let resolutions = BTreeMap::from([
            (SettingKey::MainBranch, ConflictResolution::UseCli),
            (SettingKey::DoneStatus, ConflictResolution::UseEditor),
        ]);
        assert_eq!(
            resolve_conflicts(&diff, &resolutions, true),
            resolve_conflicts(&diff, &resolutions, false)
        );
    }

    #[test]
    fn test_propagate_one_sided() {
        let diff = conflicting_diff();
        let approved = BTreeSet::from([
            SettingKey::StartWorkingStatus,
            SettingKey::BranchPattern,
            SettingKey::MainBranch,
        ]);

        let patches = propagate_one_sided(&diff, &approved);

        assert_eq!(
            patches.editor.get(SettingKey::StartWorkingStatus),
            Some("In Progress")
        );
        assert_eq!(
            patches.cli.get(SettingKey::BranchPattern),
            Some("{user}/{title}")
        );
        // MainBranch is a conflict, not one-sided.
        assert!(!patches.cli.contains(SettingKey::MainBranch));
        assert!(!patches.editor.contains(SettingKey::MainBranch));
    }

    #[test]
    fn test_merge_patches_union() {
        let diff = conflicting_diff();
        let mut patches = resolve_conflicts(
            &diff,
            &BTreeMap::from([(SettingKey::MainBranch, ConflictResolution::UseCli)]),
            false,
        );
        patches.merge(propagate_one_sided(
            &diff,
            &BTreeSet::from([SettingKey::BranchPattern]),
        ));

        assert_eq!(patches.editor.get(SettingKey::MainBranch), Some("main"));
        assert_eq!(
            patches.for_source(Source::Cli).get(SettingKey::BranchPattern),
            Some("{user}/{title}")
        );
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!("cli".parse::<ConflictResolution>(), Ok(ConflictResolution::UseCli));
        assert_eq!("vscode".parse::<ConflictResolution>(), Ok(ConflictResolution::UseEditor));
        assert_eq!("skip".parse::<ConflictResolution>(), Ok(ConflictResolution::Skip));
        assert_eq!(
            "custom:a=b".parse::<ConflictResolution>(),
            Ok(ConflictResolution::UseCustom("a=b".into()))
        );
        assert!("both".parse::<ConflictResolution>().is_err());
    }

    #[test]
    fn test_parse_resolution_arg() {
        assert_eq!(
            parse_resolution_arg("mainBranch=custom:trunk"),
            Ok((
                SettingKey::MainBranch,
                ConflictResolution::UseCustom("trunk".into())
            ))
        );
        assert_eq!(
            parse_resolution_arg("colour=cli"),
            Err(SettingsError::UnknownKey("colour".into()))
        );
        assert!(matches!(
            parse_resolution_arg("mainBranch=maybe"),
            Err(SettingsError::InvalidResolution { ref key, .. }) if key == "mainBranch"
        ));
        assert!(parse_resolution_arg("mainBranch").is_err());
    }

    #[test]
    fn test_resolved_value() {
        assert_eq!(ConflictResolution::UseCli.resolved_value("a", "b"), Some("a"));
        assert_eq!(ConflictResolution::prefer(Source::Editor).resolved_value("a", "b"), Some("b"));
        assert_eq!(ConflictResolution::Skip.resolved_value("a", "b"), None);
    }
}

//! Settings sync between the CLI config and the editor config.
//!
//! The [`SettingsSync`] drives one sync invocation:
//!
//! 1. Load both stores and diff them.
//! 2. Combine the caller's conflict resolutions with the one-sided keys the
//!    caller approved into a single pair of patches.
//! 3. Write each non-empty patch to its store, unless this is a dry run.
//!
//! Prompting the user for decisions happens between steps 1 and 2 and is
//! entirely the caller's business.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::CoreError;
use crate::settings::{
    compute_diff, propagate_one_sided, resolve_conflicts, ConflictResolution, MergePatches,
    SettingKey, SettingsDiff,
};
use crate::store::SettingsStore;

/// What a sync invocation wrote (or would have written).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub written_to_cli: Vec<SettingKey>,
    pub written_to_editor: Vec<SettingKey>,
    pub dry_run: bool,
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        self.written_to_cli.is_empty() && self.written_to_editor.is_empty()
    }
}

/// Sync driver over a CLI config store and an editor settings store.
pub struct SettingsSync<C, E> {
    cli: C,
    editor: E,
}

impl<C: SettingsStore, E: SettingsStore> SettingsSync<C, E> {
    pub fn new(cli: C, editor: E) -> Self {
        Self { cli, editor }
    }

    pub fn cli_store(&self) -> &C {
        &self.cli
    }

    pub fn editor_store(&self) -> &E {
        &self.editor
    }

    /// Load both sources and diff every syncable key.
    pub fn diff(&self) -> Result<SettingsDiff, CoreError> {
        let cli = self.cli.load()?;
        let editor = self.editor.load()?;
        let diff = compute_diff(&cli, &editor, &SettingKey::ALL);
        info!(summary = %diff.summary(), "settings diff computed");
        Ok(diff)
    }

    /// Combine conflict resolutions and approved one-sided keys into patches.
    pub fn plan(
        &self,
        diff: &SettingsDiff,
        resolutions: &BTreeMap<SettingKey, ConflictResolution>,
        approved_one_sided: &BTreeSet<SettingKey>,
        dry_run: bool,
    ) -> MergePatches {
        let mut patches = resolve_conflicts(diff, resolutions, dry_run);
        patches.merge(propagate_one_sided(diff, approved_one_sided));
        patches
    }

    /// Write `patches` to their stores. With `dry_run` nothing is written but
    /// the outcome still lists what would have been.
    pub fn apply(&self, patches: &MergePatches, dry_run: bool) -> Result<SyncOutcome, CoreError> {
        let outcome = SyncOutcome {
            written_to_cli: patches.cli.keys().collect(),
            written_to_editor: patches.editor.keys().collect(),
            dry_run,
        };

        if dry_run {
            info!(
                cli = outcome.written_to_cli.len(),
                editor = outcome.written_to_editor.len(),
                "dry run, no settings written"
            );
            return Ok(outcome);
        }

        if !patches.cli.is_empty() {
            self.cli.save(&patches.cli)?;
        }
        if !patches.editor.is_empty() {
            self.editor.save(&patches.editor)?;
        }

        info!(
            cli = outcome.written_to_cli.len(),
            editor = outcome.written_to_editor.len(),
            "settings sync applied"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SyncableSettings;
    use crate::store::MemoryStore;

    fn stores() -> SettingsSync<MemoryStore, MemoryStore> {
        let cli: SyncableSettings = [
            (SettingKey::MainBranch, "main"),
            (SettingKey::StartWorkingStatus, "In Progress"),
        ]
        .into_iter()
        .collect();
        let editor: SyncableSettings = [
            (SettingKey::MainBranch, "master"),
            (SettingKey::DoneStatus, "Done"),
        ]
        .into_iter()
        .collect();
        SettingsSync::new(MemoryStore::new(cli), MemoryStore::new(editor))
    }

    #[test]
    fn test_full_sync_converges() {
        let sync = stores();
        let diff = sync.diff().unwrap();
        let resolutions = BTreeMap::from([(SettingKey::MainBranch, ConflictResolution::UseCli)]);
        let approved = BTreeSet::from([SettingKey::StartWorkingStatus, SettingKey::DoneStatus]);

        let patches = sync.plan(&diff, &resolutions, &approved, false);
        let outcome = sync.apply(&patches, false).unwrap();

        assert_eq!(outcome.written_to_cli, vec![SettingKey::DoneStatus]);
        assert_eq!(
            outcome.written_to_editor,
            vec![SettingKey::MainBranch, SettingKey::StartWorkingStatus]
        );
        assert!(!sync.diff().unwrap().has_differences());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let sync = stores();
        let before_cli = sync.cli_store().snapshot();
        let before_editor = sync.editor_store().snapshot();

        let diff = sync.diff().unwrap();
        let resolutions = BTreeMap::from([(
            SettingKey::MainBranch,
            ConflictResolution::UseCustom("develop".into()),
        )]);
        let patches = sync.plan(&diff, &resolutions, &BTreeSet::new(), true);
        let outcome = sync.apply(&patches, true).unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.written_to_cli, vec![SettingKey::MainBranch]);
        assert_eq!(sync.cli_store().snapshot(), before_cli);
        assert_eq!(sync.editor_store().snapshot(), before_editor);
    }

    #[test]
    fn test_nothing_approved_is_noop() {
        let sync = stores();
        let diff = sync.diff().unwrap();
        let patches = sync.plan(&diff, &BTreeMap::new(), &BTreeSet::new(), false);
        assert!(sync.apply(&patches, false).unwrap().is_noop());
    }
}

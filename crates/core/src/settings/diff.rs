//! Settings diffing.
//!
//! Given the values each source holds for the syncable keys, classify every
//! configured key into exactly one of four buckets.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keys::{SettingKey, Source};
use super::SyncableSettings;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A key together with the single value it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValue {
    pub key: SettingKey,
    pub value: String,
}

/// A key configured on both sides with different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingConflict {
    pub key: SettingKey,
    /// Human-readable key label, from the static display-name table.
    pub display_name: String,
    pub cli_value: String,
    pub editor_value: String,
}

/// Classification of every key configured in at least one source.
///
/// The four lists are pairwise disjoint by key, and together cover exactly
/// the keys present in either source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDiff {
    pub matching: Vec<SettingValue>,
    pub conflicts: Vec<SettingConflict>,
    pub only_in_cli: Vec<SettingValue>,
    pub only_in_editor: Vec<SettingValue>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Compare two sources over `keys`.
///
/// Values are compared as exact strings: no trimming, no case folding. Keys
/// absent from both sources do not appear in the result.
pub fn compute_diff(
    cli: &SyncableSettings,
    editor: &SyncableSettings,
    keys: &[SettingKey],
) -> SettingsDiff {
    let mut diff = SettingsDiff::default();

    for &key in keys {
        match (cli.get(key), editor.get(key)) {
            (None, None) => {}
            (Some(a), Some(b)) if a == b => {
                debug!(%key, "setting matches");
                diff.matching.push(SettingValue {
                    key,
                    value: a.to_string(),
                });
            }
            (Some(a), Some(b)) => {
                debug!(%key, cli = a, editor = b, "setting conflicts");
                diff.conflicts.push(SettingConflict {
                    key,
                    display_name: key.display_name().to_string(),
                    cli_value: a.to_string(),
                    editor_value: b.to_string(),
                });
            }
            (Some(a), None) => {
                debug!(%key, "setting only in CLI config");
                diff.only_in_cli.push(SettingValue {
                    key,
                    value: a.to_string(),
                });
            }
            (None, Some(b)) => {
                debug!(%key, "setting only in editor config");
                diff.only_in_editor.push(SettingValue {
                    key,
                    value: b.to_string(),
                });
            }
        }
    }

    diff
}

impl SettingsDiff {
    /// Whether anything needs reconciling. A diff holding only matching
    /// entries, or nothing at all, is already in sync.
    pub fn has_differences(&self) -> bool {
        !self.conflicts.is_empty() || !self.only_in_cli.is_empty() || !self.only_in_editor.is_empty()
    }

    /// Entries present only in `source`.
    pub fn only_in(&self, source: Source) -> &[SettingValue] {
        match source {
            Source::Cli => &self.only_in_cli,
            Source::Editor => &self.only_in_editor,
        }
    }

    /// One-line count summary, e.g.
    /// `1 matching, 2 conflicts, 1 only in CLI, 0 only in VS Code`.
    pub fn summary(&self) -> String {
        format!(
            "{} matching, {} {}, {} only in {}, {} only in {}",
            self.matching.len(),
            self.conflicts.len(),
            if self.conflicts.len() == 1 {
                "conflict"
            } else {
                "conflicts"
            },
            self.only_in_cli.len(),
            Source::Cli.label(),
            self.only_in_editor.len(),
            Source::Editor.label(),
        )
    }

    /// Every key mentioned by the diff, in bucket order.
    pub fn keys(&self) -> Vec<SettingKey> {
        self.matching
            .iter()
            .map(|v| v.key)
            .chain(self.conflicts.iter().map(|c| c.key))
            .chain(self.only_in_cli.iter().map(|v| v.key))
            .chain(self.only_in_editor.iter().map(|v| v.key))
            .collect()
    }
}

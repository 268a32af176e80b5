//! Settings reconciliation between the CLI config and the editor config.
//!
//! The reconciler is responsible for:
//! 1. **Diffing** -- classifying each syncable key as matching, conflicting,
//!    or present on one side only.
//! 2. **Resolving** -- turning per-key decisions into one patch per source.
//!
//! Nothing here performs I/O. Loading and saving live in [`crate::store`].

pub mod diff;
pub mod keys;
pub mod resolver;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use diff::{compute_diff, SettingConflict, SettingValue, SettingsDiff};
pub use keys::{SettingKey, Source, EDITOR_SECTION};
pub use resolver::{
    parse_resolution_arg, propagate_one_sided, resolve_conflicts, ConflictResolution, MergePatches,
};

/// Values for the syncable keys held by one source.
///
/// A missing key means "not configured in that source".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncableSettings(BTreeMap<SettingKey, String>);

impl SyncableSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) -> Option<String> {
        self.0.insert(key, value.into())
    }

    pub fn remove(&mut self, key: SettingKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Keys present, in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = SettingKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Overlay `other` onto `self`; values in `other` win.
    pub fn extend(&mut self, other: SyncableSettings) {
        self.0.extend(other.0);
    }
}

impl<V: Into<String>> FromIterator<(SettingKey, V)> for SyncableSettings {
    fn from_iter<I: IntoIterator<Item = (SettingKey, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

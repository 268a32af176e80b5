//! ghprojects core library.
//!
//! This crate provides the logic behind the GitHub Projects branch workflow:
//! reconciling settings between the CLI config and the editor config,
//! generating branch names for issues, and ranking existing branches by
//! relevance to an issue. It also provides the file-backed stores for both
//! settings sources and a small sync driver on top of them.

pub mod branch;
pub mod config;
pub mod errors;
pub mod settings;
pub mod store;
pub mod sync;

// Re-exports for convenience.
pub use branch::{generate_branch_name, rank_branches_by_relevance, sanitize_for_branch_name};
pub use config::AppConfig;
pub use settings::{compute_diff, resolve_conflicts, SettingKey, SettingsDiff, SyncableSettings};
pub use sync::SettingsSync;

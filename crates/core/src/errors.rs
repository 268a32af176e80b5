//! Error types for the ghprojects core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Settings errors
// ---------------------------------------------------------------------------

/// Errors from parsing setting keys and resolutions at the string boundary.
///
/// Diffing and merging themselves never fail; these errors only arise when
/// untyped input (command-line flags, file contents) is turned into typed
/// keys and resolutions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The key name is not part of the syncable key set.
    #[error("unknown setting key '{0}'")]
    UnknownKey(String),

    /// A resolution string could not be parsed.
    #[error("invalid resolution '{value}' for '{key}': expected cli, editor, skip or custom:<value>")]
    InvalidResolution { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing a settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but is not valid JSON.
    #[error("failed to parse settings file '{path}': {detail}")]
    ParseError { path: String, detail: String },

    /// The file parsed, but its top-level value is not an object.
    #[error("settings file '{0}' does not contain a JSON object")]
    NotAnObject(String),

    /// No path could be determined for the store (e.g. no home directory).
    #[error("cannot locate settings file: {0}")]
    PathUnavailable(String),

    /// Serialization failure while writing.
    #[error("failed to serialize settings: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Generic I/O wrapper.
    #[error("settings I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from application configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

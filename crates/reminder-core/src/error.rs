//! Error types for the core crate.

use std::path::PathBuf;

use reminder_models::ValueKind;
use thiserror::Error;

/// Errors from a dotted-path lookup.
///
/// All of them are per-task conditions; the classifier decides whether a
/// given field is optional or required.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A path segment does not exist in the record.
    #[error("key `{segment}` of path `{path}` not found")]
    Missing { path: String, segment: String },

    /// The leaf value has a different kind than requested.
    #[error("path `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// An intermediate segment holds something other than a nested map.
    #[error("path `{path}`: segment `{segment}` is a {found}, not a map")]
    NotNavigable {
        path: String,
        segment: String,
        found: ValueKind,
    },
}

/// Errors that abort a whole classification run.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A required field (name, executor, done flag) could not be read.
    #[error("task #{index}: required field `{field}` unreadable: {source}")]
    MissingField {
        index: usize,
        field: &'static str,
        #[source]
        source: ExtractError,
    },

    /// The deadline string does not match the configured layout.
    #[error("task #{index}: deadline `{value}` does not match `{format}`: {source}")]
    InvalidDeadline {
        index: usize,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Errors loading startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or does not match the schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be applied to its key.
    #[error("environment override {key}={value} does not fit the config key type")]
    EnvOverride { key: String, value: String },

    /// A value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// `login.login_type` is empty, unknown, or not supported.
    #[error("unsupported login type: {0:?}")]
    UnsupportedLogin(String),

    /// The members file could not be parsed.
    #[error("failed to read members from {path}: {source}")]
    Members {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A members row is missing the contact column.
    #[error("members row {line}: expected `name,contact`, got {fields} field(s)")]
    MalformedMember { line: u64, fields: usize },
}

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

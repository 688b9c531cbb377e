//! Core error types for studygroup-core.
//!
//! This module defines the error hierarchy using thiserror. Operations on the
//! session surface `Validation` and `NotFound` synchronously to the caller;
//! free-time parse failures are not part of [`CoreError`];
//! matching, countdowns and reminders degrade them instead of propagating.

use std::path::PathBuf;
use thiserror::Error;

use crate::group::GroupId;

/// Core error type for studygroup-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required input was missing or malformed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An operation referenced an unknown group or subgoal
    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// History export or import errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only
    #[error("'{field}' must not be empty")]
    EmptyField { field: &'static str },
}

/// Lookup failures for groups and their subgoals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("no active group with id {id}")]
    Group { id: GroupId },

    #[error("group {group_id} has no subgoal named '{task}'")]
    Task { group_id: GroupId, task: String },
}

/// Reasons a free-time string could not be read as a timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreeTimeError {
    #[error("free time is empty")]
    Empty,

    #[error("unrecognized free time '{input}'")]
    Unrecognized { input: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home or data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors reading a delimited history export back in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("export is missing its header row")]
    MissingHeader,

    #[error("unexpected header '{found}'")]
    BadHeader { found: String },

    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: unterminated quoted field")]
    UnterminatedQuote { row: usize },

    #[error("row {row}: invalid group id '{value}'")]
    InvalidId { row: usize, value: String },

    #[error("row {row}: invalid created_at '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

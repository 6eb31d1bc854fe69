//! Error types for savewarden-core.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A candidate filename that could not be turned into a [`crate::Save`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// Name does not carry the save extension.
    #[error("{filename}: not a save file (expected .{extension} extension)")]
    MissingExtension {
        filename: String,
        extension: &'static str,
    },

    /// Nothing left once extension and generation suffix are stripped.
    #[error("{filename}: empty slot name")]
    EmptySlotName { filename: String },

    /// Slot name still contains the generation delimiter.
    #[error("{filename}: slot name {slot_name:?} contains the generation delimiter")]
    InvalidSlotName { filename: String, slot_name: String },

    /// Suffix after the last delimiter is not a canonical generation.
    ///
    /// `slot_name` is the best-effort prefix, kept for diagnostics only.
    #[error("{filename}: malformed generation {suffix:?} for slot {slot_name:?}")]
    MalformedGeneration {
        filename: String,
        slot_name: String,
        suffix: String,
    },

    /// Directory entry whose name is not valid UTF-8.
    #[error("{filename}: file name is not valid UTF-8")]
    NonUtf8Name { filename: String },
}

impl DecodeError {
    /// The offending filename.
    pub fn filename(&self) -> &str {
        match self {
            DecodeError::MissingExtension { filename, .. }
            | DecodeError::EmptySlotName { filename }
            | DecodeError::InvalidSlotName { filename, .. }
            | DecodeError::MalformedGeneration { filename, .. }
            | DecodeError::NonUtf8Name { filename } => filename,
        }
    }
}

/// Failure to remove a single save file.
///
/// A missing file is not an error; see [`crate::DeletionOutcome::AlreadyGone`].
#[derive(Debug, Error)]
pub enum DeletionError {
    /// The OS refused the removal.
    #[error("permission denied removing {}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other OS-level failure.
    #[error("failed to remove {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeletionError {
    /// Path of the file that could not be removed.
    pub fn path(&self) -> &PathBuf {
        match self {
            DeletionError::PermissionDenied { path, .. } | DeletionError::Io { path, .. } => path,
        }
    }
}

/// Configuration loading and persistence errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::WardenConfig`].
    #[error("config file {} is invalid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Save directory setting is empty.
    #[error("save directory is not configured")]
    MissingSaves,

    /// Poll interval of zero.
    #[error("poll interval must be greater than zero")]
    InvalidInterval,

    /// No platform config directory and no override.
    #[error("could not determine the configuration directory")]
    ConfigDirNotFound,
}

/// Top-level error for savewarden-core.
#[derive(Debug, Error)]
pub enum WardenError {
    /// Listing the save directory failed; the cycle cannot proceed.
    #[error("failed to list save directory {}: {source}", .path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for savewarden-core operations.
pub type Result<T> = std::result::Result<T, WardenError>;

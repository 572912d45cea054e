//! Error types for `lit-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for lit-lib operations.
#[derive(Error, Debug)]
pub enum LitError {
    // === Lookup Errors ===
    /// No issue matched the given identifier or prefix.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// The issue has no attachment with this name.
    #[error("Attachment not found: {name} (issue {id})")]
    AttachmentNotFound { id: String, name: String },

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// No `.lit` directory in the start directory or any ancestor.
    #[error("Issue directory not found (searched upward from {})", start.display())]
    TrackerNotFound { start: PathBuf },

    // === Document Errors ===
    /// The outline text could not be parsed.
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// `store()` was called before the issues were loaded.
    #[error("Issues not loaded")]
    NotLoaded,

    // === Edit Errors ===
    /// The editor exited without touching the scratch file.
    #[error("File unchanged")]
    NoChange,

    /// The edited file did not contain any of the selected issues.
    #[error("Did not update anything")]
    NoUpdate,

    /// The editor could not be run or exited unsuccessfully.
    #[error("Editor '{program}' failed: {reason}")]
    Editor { program: String, reason: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LitError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Whether this error means something that was looked up does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IssueNotFound { .. }
                | Self::AttachmentNotFound { .. }
                | Self::FileNotFound(_)
                | Self::TrackerNotFound { .. }
        )
    }
}

/// Result type using `LitError`.
pub type Result<T> = std::result::Result<T, LitError>;

//! Store error types.
//!
//! Every store operation reports failure through [`StoreError`], which carries
//! a user-facing message and an optional remediation hint.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// File or directory I/O error.
    #[error("Failed to {operation} {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No project-relative or global save folder could be determined.
    #[error("No save folder available for project '{project}'")]
    NoSaveFolder { project: String },

    /// The folder to load from does not exist.
    #[error("Save folder not found: {}", path.display())]
    FolderNotFound { path: PathBuf },

    /// The folder exists but holds no record for any current container.
    #[error("No saved record in {} matches the current drawings", path.display())]
    NoMatchingRecords { path: PathBuf },

    /// A record file could not be parsed.
    #[error("Failed to parse record file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("Failed to serialize record for '{container}'")]
    Serialization {
        container: String,
        #[source]
        source: serde_json::Error,
    },

    /// The temp file could not be moved over the target file.
    #[error("Failed to complete save of {}", target_path.display())]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} {}.", operation, path.display()),
            Self::NoSaveFolder { project } => format!(
                "Could not determine where to save layer settings for '{project}'."
            ),
            Self::FolderNotFound { path } => {
                format!("No saved data found at {}.", path.display())
            }
            Self::NoMatchingRecords { path } => format!(
                "The folder {} does not contain settings for any drawing in this view.",
                path.display()
            ),
            Self::Parse { path, .. } => format!(
                "The saved settings file {} is damaged or not a settings file.",
                path.display()
            ),
            Self::Serialization { container, .. } => {
                format!("An error occurred while saving the settings of '{container}'.")
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::NoSaveFolder { .. } => {
                Some("Save the project to disk first, then save the layer settings again.".into())
            }
            Self::FolderNotFound { .. } => {
                Some("Save the layer settings once to create the save folder.".into())
            }
            Self::NoMatchingRecords { .. } => {
                Some("Choose the folder the settings of these drawings were saved to.".into())
            }
            Self::Parse { .. } => Some("Delete or replace the damaged file and try again.".into()),
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

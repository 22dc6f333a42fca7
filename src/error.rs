//! Error types for rpmbatch
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a descriptor path into a package descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Path does not exist or cannot be opened
    #[error("Cannot read descriptor '{path}': {error}")]
    Unreadable { path: PathBuf, error: String },

    /// The text provider failed to expand the descriptor
    #[error("Failed to expand descriptor '{path}': {error}")]
    ExpansionFailed { path: PathBuf, error: String },

    /// Zero or several `Name` directives
    #[error("Missing or ambiguous package name in '{path}' ({count} Name directives found)")]
    MissingOrAmbiguousName { path: PathBuf, count: usize },
}

impl DescriptorError {
    /// Path of the descriptor that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Unreadable { path, .. }
            | Self::ExpansionFailed { path, .. }
            | Self::MissingOrAmbiguousName { path, .. } => path,
        }
    }
}

/// Reasons a descriptor cannot be built on the host architecture
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchError {
    /// Host architecture is listed in `ExcludeArch`
    #[error("Excluded architecture: '{arch}' found in exclude list ({})", list.join(", "))]
    Excluded { arch: String, list: Vec<String> },

    /// `ExclusiveArch` is set and does not list the host architecture
    #[error("Not in exclusive architecture list: '{arch}' not found in ({})", list.join(", "))]
    NotInExclusiveList { arch: String, list: Vec<String> },
}

/// Batch-level errors
#[derive(Error, Debug)]
pub enum BatchError {
    /// Every descriptor was skipped or none were given
    #[error("Nothing to build: {skipped} descriptor(s) skipped, none eligible")]
    NothingToBuild { skipped: usize },
}

/// Errors raised by the build driver and external tools
#[derive(Error, Debug)]
pub enum DriverError {
    /// Tool is not on PATH
    #[error("Required tool not found in PATH: {tool}")]
    ToolNotFound { tool: String },

    /// Tool exited unsuccessfully
    #[error("Command '{command}' failed: {status}")]
    CommandFailed { command: String, status: String },

    /// Failed to spawn a tool or touch a file it needs
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_error_lists_tokens() {
        let err = ArchError::Excluded {
            arch: "x86_64".to_string(),
            list: vec!["x86_64".to_string(), "i686".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Excluded architecture: 'x86_64' found in exclude list (x86_64, i686)"
        );
    }

    #[test]
    fn test_descriptor_error_path() {
        let err = DescriptorError::MissingOrAmbiguousName {
            path: PathBuf::from("SPECS/foo.spec"),
            count: 2,
        };
        assert_eq!(err.path(), &PathBuf::from("SPECS/foo.spec"));
        assert!(err.to_string().contains("Missing or ambiguous package name"));
    }
}

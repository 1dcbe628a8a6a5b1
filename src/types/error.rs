//! Error types for rekon

use std::path::PathBuf;
use thiserror::Error;

/// Process exit status used when the operator quits.
pub const EXIT_QUIT: u8 = 3;

/// Process exit status used for every fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Error types for rekon operations
#[derive(Debug, Error)]
pub enum RekonError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (root checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Copy target already exists
    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },

    /// Replace target vanished since it was listed
    #[error("{path} doesn't exist, nothing to replace")]
    ReplaceTargetMissing { path: PathBuf },

    /// Replace was asked to touch a folder
    #[error("Entry replacement can't deal with folders: {path}")]
    ReplaceDirectory { path: PathBuf },

    /// Neither file, folder nor symlink
    #[error("Unsupported entry type: {path}")]
    UnsupportedEntry { path: PathBuf },

    /// Operator input stream ended before a decision was made
    #[error("Input closed while waiting for a decision")]
    InputClosed,

    /// The operator chose to quit
    #[error("Quit requested by operator")]
    Quit,
}

impl RekonError {
    /// Check if this error is an explicit quit rather than a failure
    pub fn is_quit(&self) -> bool {
        matches!(self, RekonError::Quit)
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, RekonError::Validation(_) | RekonError::Config(_))
    }

    /// Check if this error means the filesystem changed under the run
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            RekonError::AlreadyExists { .. }
                | RekonError::ReplaceTargetMissing { .. }
                | RekonError::ReplaceDirectory { .. }
        )
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_quit() {
            EXIT_QUIT
        } else {
            EXIT_FAILURE
        }
    }
}

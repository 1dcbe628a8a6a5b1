//! Executor module for file operations
//!
//! Every mutation goes through [`Executor`]. Preconditions are checked in
//! both modes; under dry-run only the mutating primitive is skipped, so a dry
//! run takes exactly the same path as a real one.

pub mod copy;

pub use copy::{copy_file_atomic, copy_symlink, copy_tree, replace_symlink};

use crate::types::{Entry, EntryKind, RekonError};
use crate::Config;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Performs copy and replace actions, or only pretends to under dry-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Executor {
    dry_run: bool,
}

impl Executor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dry_run)
    }

    /// Copy a source-only `entry` into `destination_dir`
    ///
    /// # Errors
    /// * `RekonError::AlreadyExists` if the target appeared since listing
    pub fn copy_entry(&self, entry: &Entry, destination_dir: &Path) -> Result<u64, RekonError> {
        let target = destination_dir.join(&entry.name);
        if fs::symlink_metadata(&target).is_ok() {
            return Err(RekonError::AlreadyExists { path: target });
        }

        if self.dry_run {
            info!(source = %entry.path.display(), target = %target.display(), "dry-run: copy skipped");
            return Ok(0);
        }

        let bytes = match entry.kind {
            EntryKind::Folder => copy_tree(&entry.path, &target)?,
            EntryKind::Symlink => copy_symlink(&entry.path, &target)?,
            EntryKind::File => copy_file_atomic(&entry.path, &target)?,
        };
        info!(source = %entry.path.display(), target = %target.display(), bytes, "copied");
        Ok(bytes)
    }

    /// Overwrite `destination` with `source`
    ///
    /// # Errors
    /// * `RekonError::ReplaceTargetMissing` if the destination vanished
    /// * `RekonError::ReplaceDirectory` if either side is a folder
    pub fn replace_entry(&self, source: &Entry, destination: &Entry) -> Result<u64, RekonError> {
        let current = match fs::symlink_metadata(&destination.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RekonError::ReplaceTargetMissing {
                    path: destination.path.clone(),
                })
            }
            Err(e) => return Err(RekonError::Io(e)),
        };
        if source.is_dir() || destination.is_dir() || current.is_dir() {
            return Err(RekonError::ReplaceDirectory {
                path: destination.path.clone(),
            });
        }

        if self.dry_run {
            info!(target = %destination.path.display(), "dry-run: replace skipped");
            return Ok(0);
        }

        let bytes = if source.is_symlink() || current.file_type().is_symlink() {
            replace_symlink_or_file(source, destination, current.file_type().is_symlink())?
        } else {
            copy_file_atomic(&source.path, &destination.path)?
        };
        info!(target = %destination.path.display(), bytes, "replaced");
        Ok(bytes)
    }
}

/// Replace when a symlink is involved on either side
fn replace_symlink_or_file(
    source: &Entry,
    destination: &Entry,
    destination_is_link: bool,
) -> Result<u64, RekonError> {
    if source.is_symlink() {
        return replace_symlink(&source.path, &destination.path);
    }
    if destination_is_link {
        // Never write through a link into whatever it points at
        fs::remove_file(&destination.path)?;
    }
    copy_file_atomic(&source.path, &destination.path)
}

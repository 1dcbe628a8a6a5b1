//! Entry - Read-only snapshot of one filesystem node

use super::RekonError;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
    Symlink,
}

impl EntryKind {
    /// Classify node metadata obtained without following symlinks
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Result<Self, RekonError> {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Ok(EntryKind::Symlink)
        } else if file_type.is_dir() {
            Ok(EntryKind::Folder)
        } else if file_type.is_file() {
            Ok(EntryKind::File)
        } else {
            Err(RekonError::UnsupportedEntry {
                path: path.to_path_buf(),
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
            EntryKind::Symlink => "symlink",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents one node on either side of a reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Absolute path
    pub path: PathBuf,

    /// Base name, the pairing key between sides
    pub name: OsString,

    pub kind: EntryKind,

    /// Size in bytes of the node itself (symlinks are not followed)
    pub size: u64,

    /// Last modification time
    pub modified: SystemTime,

    /// Creation time, when the platform records one
    pub created: Option<SystemTime>,
}

impl Entry {
    /// Create a new Entry with the given parameters
    pub fn new(
        path: PathBuf,
        name: OsString,
        kind: EntryKind,
        size: u64,
        modified: SystemTime,
    ) -> Self {
        Self {
            path,
            name,
            kind,
            size,
            modified,
            created: None,
        }
    }

    /// Set the creation time for this entry
    pub fn with_created(mut self, created: SystemTime) -> Self {
        self.created = Some(created);
        self
    }

    /// Snapshot the node at `path` without following a final symlink
    pub fn from_path(path: &Path) -> Result<Self, RekonError> {
        let path = std::path::absolute(path)?;
        let metadata = std::fs::symlink_metadata(&path)?;
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string());
        Self::from_metadata(path, name, &metadata)
    }

    /// Build an entry from metadata already read by a directory listing
    pub fn from_metadata(
        path: PathBuf,
        name: OsString,
        metadata: &Metadata,
    ) -> Result<Self, RekonError> {
        let kind = EntryKind::from_metadata(&path, metadata)?;
        let modified = metadata.modified()?;
        let mut entry = Self::new(path, name, kind, metadata.len(), modified);
        entry.created = metadata.created().ok();
        Ok(entry)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Name for display, lossily converted
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

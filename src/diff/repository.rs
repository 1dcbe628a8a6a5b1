//! Shape-only equality for version-control working copies
//!
//! Object storage inside a repository diverges byte-for-byte between clones
//! that are logically identical, so paired working copies are compared by
//! folder shape alone and never descended into file by file.

use crate::scanner::{plain_walker, walk_error};
use crate::types::RekonError;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Metadata folder that marks a working copy
pub const REPOSITORY_MARKER: &str = ".git";

/// Whether `dir` holds a repository metadata folder
pub fn is_repository(dir: &Path) -> bool {
    fs::symlink_metadata(dir.join(REPOSITORY_MARKER))
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Sorted names of the immediate subfolders of `dir`
fn subfolder_names(dir: &Path) -> Result<Vec<OsString>, RekonError> {
    let mut names = Vec::new();
    for child in fs::read_dir(dir)? {
        let child = child?;
        if child.file_type()?.is_dir() {
            names.push(child.file_name());
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Depth-first stream of per-folder subfolder name sets
struct Shapes {
    walk: ignore::Walk,
}

impl Shapes {
    fn new(root: &Path) -> Self {
        let walk = plain_walker(root)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        Self { walk }
    }
}

impl Iterator for Shapes {
    type Item = Result<Vec<OsString>, RekonError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dent = match self.walk.next()? {
                Ok(dent) => dent,
                Err(e) => return Some(Err(walk_error(e))),
            };
            if dent.file_type().is_some_and(|t| t.is_dir()) {
                return Some(subfolder_names(dent.path()));
            }
        }
    }
}

/// Compare two working copies by folder shape.
///
/// Both trees are walked in lock-step; at each folder only the set of
/// immediate subfolder names is compared. Any disagreement, or one walk
/// ending first, means the repositories differ. Files are never compared.
pub fn repositories_match(source: &Path, destination: &Path) -> Result<bool, RekonError> {
    let mut left = Shapes::new(source);
    let mut right = Shapes::new(destination);
    let mut steps = 0usize;

    loop {
        match (left.next().transpose()?, right.next().transpose()?) {
            (None, None) => {
                debug!(source = %source.display(), steps, "repository shapes match");
                return Ok(true);
            }
            (Some(l), Some(r)) if l == r => steps += 1,
            _ => {
                debug!(source = %source.display(), steps, "repository shapes differ");
                return Ok(false);
            }
        }
    }
}

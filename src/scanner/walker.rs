//! Single-level directory listing

use crate::types::{Entry, RekonError};
use std::io;
use std::path::Path;
use tracing::debug;

/// Build a walker with every ignore filter disabled and symlinks not followed
pub(crate) fn plain_walker(root: &Path) -> ignore::WalkBuilder {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false);
    builder
}

/// Convert a walker error into an IO error, keeping the OS error if present
pub(crate) fn walk_error(error: ignore::Error) -> RekonError {
    let message = error.to_string();
    match error.into_io_error() {
        Some(io_error) => RekonError::Io(io_error),
        None => RekonError::Io(io::Error::other(message)),
    }
}

/// List the immediate children of `dir`, sorted by name
///
/// Names compare bytewise and case-sensitively. Every listed node is
/// snapshotted without following symlinks.
///
/// # Errors
/// * Any listing or metadata failure is fatal and returned as `RekonError::Io`
/// * A node that is neither file, folder nor symlink returns
///   `RekonError::UnsupportedEntry`
pub fn list_entries(dir: &Path) -> Result<Vec<Entry>, RekonError> {
    let walker = plain_walker(dir).max_depth(Some(1)).build();
    let mut entries = Vec::new();

    for result in walker {
        let dent = result.map_err(walk_error)?;
        if dent.depth() == 0 {
            continue;
        }

        let metadata = dent.metadata().map_err(walk_error)?;
        let entry = Entry::from_metadata(
            dent.path().to_path_buf(),
            dent.file_name().to_os_string(),
            &metadata,
        )?;
        entries.push(entry);
    }

    entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = entries.len(), "listed directory");

    Ok(entries)
}

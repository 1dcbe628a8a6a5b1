//! Divergence classification for a matched pair of entries

use crate::config::TimeMode;
use crate::types::{Entry, EntryKind, RekonError};
use std::time::SystemTime;

/// Independent content flags for two non-directory entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentDivergence {
    /// (source, destination) sizes when they differ
    pub size: Option<(u64, u64)>,

    /// (source, destination) timestamps when they differ
    pub time: Option<(SystemTime, SystemTime)>,
}

impl ContentDivergence {
    pub fn is_divergent(&self) -> bool {
        self.size.is_some() || self.time.is_some()
    }
}

/// Outcome of comparing two same-named entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// file vs folder vs symlink, never resolved automatically
    KindMismatch {
        source: EntryKind,
        destination: EntryKind,
    },

    /// Both folders, to be descended into
    Directories,

    /// Size and/or time differ
    Content(ContentDivergence),

    /// Same size and timestamp
    InSync,
}

/// The timestamp selected by `mode`
pub fn timestamp(entry: &Entry, mode: TimeMode) -> Result<SystemTime, RekonError> {
    match mode {
        TimeMode::Modified => Ok(entry.modified),
        TimeMode::Created => entry.created.ok_or_else(|| {
            RekonError::Config(format!(
                "Creation time is not available for {}",
                entry.path.display()
            ))
        }),
    }
}

/// Classify a same-named pair.
///
/// Metadata only: sizes and the selected timestamp are compared, contents
/// are never read.
pub fn classify(
    source: &Entry,
    destination: &Entry,
    mode: TimeMode,
) -> Result<Classification, RekonError> {
    if source.kind != destination.kind {
        return Ok(Classification::KindMismatch {
            source: source.kind,
            destination: destination.kind,
        });
    }

    if source.is_dir() {
        return Ok(Classification::Directories);
    }

    let mut divergence = ContentDivergence::default();
    if source.size != destination.size {
        divergence.size = Some((source.size, destination.size));
    }

    let src_time = timestamp(source, mode)?;
    let dst_time = timestamp(destination, mode)?;
    if src_time != dst_time {
        divergence.time = Some((src_time, dst_time));
    }

    if divergence.is_divergent() {
        Ok(Classification::Content(divergence))
    } else {
        Ok(Classification::InSync)
    }
}

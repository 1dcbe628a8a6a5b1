//! Diff engine - correspondence, classification and repository checks

mod compare;
mod merge;
mod repository;

pub use compare::{classify, timestamp, Classification, ContentDivergence};
pub use merge::{merge_entries, merge_sorted, Merge};
pub use repository::{is_repository, repositories_match, REPOSITORY_MARKER};

//! Core type definitions for rekon

mod context;
mod entry;
mod error;

pub use context::{Context, DirectoryPair};
pub use entry::{Entry, EntryKind};
pub use error::{RekonError, EXIT_FAILURE, EXIT_QUIT};

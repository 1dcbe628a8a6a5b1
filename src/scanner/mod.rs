//! Directory scanning logic

mod walker;

pub(crate) use walker::{plain_walker, walk_error};
pub use walker::list_entries;

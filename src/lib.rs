//! # rekon - Interactive directory reconciliation
//!
//! Walks a source folder and its backup side by side and asks before every
//! change. Extras in the source can be copied, diverging files replaced, and
//! everything else is reported for the operator to handle. Nothing is ever
//! deleted.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod engine;
pub mod executor;
pub mod logging;
pub mod protocol;
pub mod scanner;
pub mod skiplist;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use engine::{Reconciler, RunStats};
pub use types::{Entry, EntryKind, RekonError, EXIT_FAILURE, EXIT_QUIT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

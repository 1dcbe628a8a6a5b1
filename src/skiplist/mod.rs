//! Skip lists - known-expected one-sided entries
//!
//! Two independent lists exist: one suppresses source-only extras, the other
//! destination-only extras. Both are loaded once at startup and stay
//! immutable for the run.

mod trie;

pub use trie::SuffixTrie;

use crate::types::RekonError;
use crate::Config;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Loaded skip lists for both sides
#[derive(Debug, Default, Clone)]
pub struct SkipLists {
    source: SuffixTrie,
    destination: SuffixTrie,
}

impl SkipLists {
    pub fn new(source: SuffixTrie, destination: SuffixTrie) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Load both lists from the files named in `config`
    pub fn load(config: &Config) -> Result<Self, RekonError> {
        Ok(Self {
            source: load_list(&config.source_skip_list)?,
            destination: load_list(&config.destination_skip_list)?,
        })
    }

    /// Whether a source-only entry at `relative_path` is expected
    pub fn source_ignores(&self, relative_path: &Path) -> bool {
        self.source.matches(relative_path)
    }

    /// Whether a destination-only entry at `relative_path` is expected
    pub fn destination_ignores(&self, relative_path: &Path) -> bool {
        self.destination.matches(relative_path)
    }
}

/// Read one list file, creating it empty when absent
pub fn load_list(path: &Path) -> Result<SuffixTrie, RekonError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let trie = SuffixTrie::parse(&text);
            debug!(path = %path.display(), suffixes = trie.len(), "loaded skip list");
            Ok(trie)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, "")?;
            info!(path = %path.display(), "created empty skip list");
            Ok(SuffixTrie::new())
        }
        Err(e) => Err(RekonError::Io(e)),
    }
}

//! Traversal context - the chain of directory pairs from the roots down

use super::Entry;
use std::path::PathBuf;

/// The (source, destination) entries compared at one nesting depth
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryPair {
    pub source: Entry,
    pub destination: Entry,

    /// Name shown at this depth
    pub display: String,
}

impl DirectoryPair {
    pub fn new(source: Entry, destination: Entry) -> Self {
        let display = source.display_name();
        Self {
            source,
            destination,
            display,
        }
    }
}

/// Immutable parent-linked traversal context.
///
/// A frame lives exactly as long as the scope that created it, so leaving a
/// name's handling on any path drops its frame. The root frame holds the
/// user-supplied roots.
#[derive(Debug)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    pair: DirectoryPair,
    depth: usize,
}

impl<'a> Context<'a> {
    /// Root frame for the user-supplied roots
    pub fn root(source: Entry, destination: Entry) -> Self {
        Self {
            parent: None,
            pair: DirectoryPair {
                source,
                destination,
                display: "[root]".to_string(),
            },
            depth: 1,
        }
    }

    /// Push a child frame borrowing this one as its parent
    pub fn child(&'a self, pair: DirectoryPair) -> Context<'a> {
        Context {
            parent: Some(self),
            pair,
            depth: self.depth + 1,
        }
    }

    /// Active comparison
    pub fn pair(&self) -> &DirectoryPair {
        &self.pair
    }

    pub fn parent(&self) -> Option<&Context<'a>> {
        self.parent
    }

    /// Number of frames, root included
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Path of the active pair relative to the roots (empty at the root)
    pub fn relative_path(&self) -> PathBuf {
        let mut names = Vec::with_capacity(self.depth);
        let mut frame = Some(self);
        while let Some(current) = frame {
            if current.parent.is_some() {
                names.push(current.pair.source.name.clone());
            }
            frame = current.parent;
        }
        names.iter().rev().collect()
    }
}
